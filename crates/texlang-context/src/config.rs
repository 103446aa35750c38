/// Configuration of a [`crate::ScopedContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Largest allowed value of `\mag`.
    pub max_magnification: i32,
    /// Value of `\mag` before it is first set.
    pub initial_magnification: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_magnification: 32768,
            initial_magnification: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"max_magnification": 4000}"#).unwrap();
        assert_eq!(
            config,
            Config {
                max_magnification: 4000,
                initial_magnification: 1000,
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<Config>(&json).unwrap(), config);
    }

    #[test]
    fn default() {
        assert_eq!(Config::default().max_magnification, 32768);
        assert_eq!(Config::default().initial_magnification, 1000);
    }
}
