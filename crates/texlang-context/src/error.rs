/// Error returned by context operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A group was closed while only the global group was open.
    TooManyRightBraces,
    /// The magnification was changed after it was used.
    IncompatibleMagnification { current: i32, requested: i32 },
    /// The magnification is not positive or is larger than the configured maximum.
    IllegalMagnification { requested: i32, max: i32 },
}

impl ContextError {
    /// One-line description of the error.
    pub fn title(&self) -> String {
        match self {
            ContextError::TooManyRightBraces => "Too many }'s".into(),
            ContextError::IncompatibleMagnification { current, requested } => {
                format!(
                    "Incompatible magnification ({requested}); \
                    the previous value will be retained ({current})"
                )
            }
            ContextError::IllegalMagnification { requested, .. } => {
                format!("Illegal magnification ({requested})")
            }
        }
    }

    /// Help text for the error.
    ///
    /// TeX.2021.1069, TeX.2021.288
    pub fn notes(&self) -> Vec<String> {
        match self {
            ContextError::TooManyRightBraces => vec![
                "You've closed more groups than you opened.".into(),
                "Such booboos are generally harmless, so keep going.".into(),
            ],
            ContextError::IncompatibleMagnification { .. } => vec![
                "I can handle only one magnification ratio per job.".into(),
                "So I've reverted to the magnification you used earlier on this page.".into(),
            ],
            ContextError::IllegalMagnification { max, .. } => {
                vec![format!("The magnification ratio must be between 1 and {max}.")]
            }
        }
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl std::error::Error for ContextError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ContextError::IncompatibleMagnification {
            current: 2000,
            requested: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Incompatible magnification (1000); the previous value will be retained (2000)"
        );
        let err = ContextError::IllegalMagnification {
            requested: 0,
            max: 32768,
        };
        assert_eq!(
            err.notes(),
            vec!["The magnification ratio must be between 1 and 32768.".to_string()]
        );
        assert_eq!(ContextError::TooManyRightBraces.notes().len(), 2);
    }
}
