use crate::conditional::{Conditional, ConditionalStack, Locator};
use crate::config::Config;
use crate::error::ContextError;
use crate::group::ScopeChain;
use crate::marks::DocumentRunState;
use crate::observer::{LifecycleEvent, ObserverId, ObserverKey, Observers};
use crate::register::*;
use crate::types::*;

/// Callback run once when the group it was registered in ends.
pub type AfterGroupAction = Box<dyn FnOnce(&mut ScopedContext)>;

/// The state of an interpreter that is not part of the input.
///
/// All register access goes through the scope chain.
/// Every assignment notifies the observers registered for the register.
///
/// ```
/// # use texlang_context::*;
/// let mut context = ScopedContext::default();
/// context.open_group(GroupType::Simple);
/// context.set_count("x".into(), 5, Scope::Local);
/// context.open_group(GroupType::Simple);
/// assert_eq!(context.count(&"x".into()), 5);
/// context.close_group().unwrap();
/// context.close_group().unwrap();
/// assert_eq!(context.count(&"x".into()), 0);
/// context.set_count("x".into(), 7, Scope::Global);
/// assert_eq!(context.count(&"x".into()), 7);
/// ```
pub struct ScopedContext {
    config: Config,
    scopes: ScopeChain,
    observers: Observers,
    // One entry per open group, including the global group.
    after_group_actions: Vec<Vec<AfterGroupAction>>,
    conditionals: ConditionalStack,
    marks: DocumentRunState,
    error_count: usize,
    magnification: i32,
    magnification_locked: bool,
    after_assignment: Option<Token>,
}

impl Default for ScopedContext {
    fn default() -> Self {
        ScopedContext::new(Default::default())
    }
}

macro_rules! accessors {
    ( $( ($get: ident, $set: ident, $register: ty), )+ ) => {
        $(
            pub fn $get(&self, key: &<$register as Register>::Key) -> <$register as Register>::Value {
                self.get::<$register>(key)
            }

            pub fn $set(
                &mut self,
                key: <$register as Register>::Key,
                value: <$register as Register>::Value,
                scope: Scope,
            ) {
                self.set::<$register>(key, value, scope)
            }
        )+
    };
}

impl ScopedContext {
    pub fn new(config: Config) -> ScopedContext {
        ScopedContext {
            magnification: config.initial_magnification,
            config,
            scopes: Default::default(),
            observers: Default::default(),
            after_group_actions: vec![vec![]],
            conditionals: Default::default(),
            marks: Default::default(),
            error_count: 0,
            magnification_locked: false,
            after_assignment: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    /// Returns the current value of the register.
    pub fn get<R: Register>(&self, key: &R::Key) -> R::Value {
        self.scopes.get::<R>(key)
    }

    /// Assigns the register and then notifies the register's observers.
    pub fn set<R: Register>(&mut self, key: R::Key, value: R::Value, scope: Scope) {
        self.scopes.set::<R>(key.clone(), value.clone(), scope);
        self.observers.notify::<R>(&key, &value, scope);
    }

    accessors!(
        (count, set_count, Count),
        (dimen, set_dimen, Dimen),
        (glue, set_glue, Skip),
        (muskip, set_muskip, MuSkip),
        (toks, set_toks, Toks),
        (box_register, set_box_register, BoxRegister),
        (font, set_font, FontRegister),
        (catcode, set_catcode, CatCodeRegister),
        (mathcode, set_mathcode, MathCode),
        (delcode, set_delcode, DelCode),
        (sfcode, set_sfcode, SfCode),
        (lccode, set_lccode, LcCode),
        (uccode, set_uccode, UcCode),
        (if_flag, set_if_flag, IfFlag),
        (macro_binding, set_macro_binding, Macro),
        (active, set_active, Active),
        (in_file, set_in_file, InFile),
        (out_file, set_out_file, OutFile),
    );

    pub fn interaction(&self) -> Interaction {
        self.get::<InteractionMode>(&())
    }

    pub fn set_interaction(&mut self, interaction: Interaction, scope: Scope) {
        self.set::<InteractionMode>((), interaction, scope)
    }

    pub fn namespace(&self) -> String {
        self.get::<Namespace>(&())
    }

    pub fn set_namespace(&mut self, namespace: String, scope: Scope) {
        self.set::<Namespace>((), namespace, scope)
    }

    pub fn typesetting_context(&self) -> TypesettingContext {
        self.get::<Typesetting>(&())
    }

    pub fn set_typesetting_context(&mut self, context: TypesettingContext, scope: Scope) {
        self.set::<Typesetting>((), context, scope)
    }

    /// Registers an observer for assignments to registers of the family `R`.
    pub fn register_observer<R, F>(&mut self, key: ObserverKey<R::Key>, callback: F) -> ObserverId
    where
        R: Register,
        F: FnMut(&R::Key, &R::Value, Scope) + 'static,
    {
        self.observers.register::<R, F>(key, callback)
    }

    pub fn unregister_observer<R: Register>(&mut self, id: ObserverId) -> bool {
        self.observers.unregister::<R>(id)
    }

    /// Registers an observer for group and conditional events.
    pub fn register_lifecycle_observer<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&LifecycleEvent) + 'static,
    {
        self.observers.register_lifecycle(callback)
    }

    pub fn unregister_lifecycle_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister_lifecycle(id)
    }

    pub fn level(&self) -> usize {
        self.scopes.level()
    }

    pub fn is_global_group(&self) -> bool {
        self.scopes.is_global_group()
    }

    pub fn group_type(&self) -> GroupType {
        self.scopes.group_type()
    }

    pub fn open_group(&mut self, group_type: GroupType) {
        self.scopes.open_group(group_type);
        self.after_group_actions.push(vec![]);
        let event = LifecycleEvent::GroupOpened {
            level: self.level(),
            group_type,
        };
        self.observers.notify_lifecycle(&event);
    }

    /// Ends the innermost group.
    ///
    /// The group's after-group actions run first, in the order they were registered.
    /// Returns the tokens queued with [`ScopedContext::after_group`].
    pub fn close_group(&mut self) -> Result<TokenList, ContextError> {
        let level = self.level();
        let frame = self.scopes.close_group()?;
        for action in self.after_group_actions.pop().unwrap_or_default() {
            action(self);
        }
        let event = LifecycleEvent::GroupClosed {
            level,
            group_type: frame.group_type(),
        };
        self.observers.notify_lifecycle(&event);
        Ok(frame.into_after_group_tokens())
    }

    /// Queues a token to be returned when the innermost group ends.
    pub fn after_group(&mut self, token: Token) {
        self.scopes.after_group(token);
    }

    /// Registers an action to run when the innermost group ends.
    ///
    /// Actions registered in the global group never run.
    pub fn after_group_action<F>(&mut self, action: F)
    where
        F: FnOnce(&mut ScopedContext) + 'static,
    {
        if let Some(actions) = self.after_group_actions.last_mut() {
            actions.push(Box::new(action));
        }
    }

    /// Sets the token inserted after the next assignment, as with `\afterassignment`.
    pub fn set_after_assignment(&mut self, token: Token) {
        self.after_assignment = Some(token);
    }

    pub fn take_after_assignment(&mut self) -> Option<Token> {
        self.after_assignment.take()
    }

    pub fn push_conditional(&mut self, locator: Locator, value: bool) {
        let conditional = Conditional { locator, value };
        self.conditionals.push(conditional.clone());
        self.observers
            .notify_lifecycle(&LifecycleEvent::ConditionalPushed(conditional));
    }

    /// Removes the innermost conditional, or returns `None` if there is none.
    pub fn pop_conditional(&mut self) -> Option<Conditional> {
        let conditional = self.conditionals.pop()?;
        self.observers
            .notify_lifecycle(&LifecycleEvent::ConditionalPopped(conditional.clone()));
        Some(conditional)
    }

    pub fn conditionals(&self) -> &ConditionalStack {
        &self.conditionals
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Increments the error count and returns the new count.
    pub fn increment_error_count(&mut self) -> usize {
        self.error_count += 1;
        self.error_count
    }

    pub fn magnification(&self) -> i32 {
        self.magnification
    }

    /// Sets the magnification and locks it.
    ///
    /// Once locked, the magnification can only be set to its current value
    ///     until [`ScopedContext::unlock_magnification`] is called.
    /// An illegal value is rejected but still locks the previous value (TeX.2021.288).
    ///
    /// ```
    /// # use texlang_context::*;
    /// let mut context = ScopedContext::default();
    /// assert_eq!(context.set_magnification(2000), Ok(()));
    /// assert_eq!(
    ///     context.set_magnification(1000),
    ///     Err(ContextError::IncompatibleMagnification { current: 2000, requested: 1000 })
    /// );
    /// assert_eq!(context.set_magnification(2000), Ok(()));
    /// ```
    pub fn set_magnification(&mut self, magnification: i32) -> Result<(), ContextError> {
        if self.magnification_locked && self.magnification != magnification {
            return Err(ContextError::IncompatibleMagnification {
                current: self.magnification,
                requested: magnification,
            });
        }
        self.magnification_locked = true;
        if !(1..=self.config.max_magnification).contains(&magnification) {
            return Err(ContextError::IllegalMagnification {
                requested: magnification,
                max: self.config.max_magnification,
            });
        }
        self.magnification = magnification;
        Ok(())
    }

    pub fn is_magnification_locked(&self) -> bool {
        self.magnification_locked
    }

    pub fn unlock_magnification(&mut self) {
        self.magnification_locked = false;
    }

    pub fn marks(&self) -> &DocumentRunState {
        &self.marks
    }

    pub fn marks_mut(&mut self) -> &mut DocumentRunState {
        &mut self.marks
    }
}

impl std::fmt::Debug for ScopedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedContext")
            .field("config", &self.config)
            .field("scopes", &self.scopes)
            .field("observers", &self.observers)
            .field(
                "after_group_actions",
                &self.after_group_actions.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("conditionals", &self.conditionals)
            .field("marks", &self.marks)
            .field("error_count", &self.error_count)
            .field("magnification", &self.magnification)
            .field("magnification_locked", &self.magnification_locked)
            .field("after_assignment", &self.after_assignment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatCode;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use texcraft_core::{Glue, Scaled};

    fn x() -> String {
        "x".to_string()
    }

    #[test]
    fn count_scenario() {
        let mut context = ScopedContext::default();
        context.open_group(GroupType::Simple);
        context.set_count(x(), 5, Scope::Local);
        context.open_group(GroupType::Simple);
        assert_eq!(context.count(&x()), 5);
        context.close_group().unwrap();
        context.close_group().unwrap();
        assert!(context.is_global_group());
        context.set_count(x(), 7, Scope::Global);
        context.open_group(GroupType::Simple);
        context.open_group(GroupType::Simple);
        assert_eq!(context.count(&x()), 7);
    }

    #[test]
    fn dimen_reverts() {
        let mut context = ScopedContext::default();
        context.open_group(GroupType::Simple);
        context.open_group(GroupType::Simple);
        context.set_dimen(x(), Scaled::ONE, Scope::Local);
        context.close_group().unwrap();
        assert_eq!(context.dimen(&x()), Scaled::ZERO);
    }

    #[test]
    fn closing_bottom_group_fails() {
        let mut context = ScopedContext::default();
        assert_eq!(context.close_group(), Err(ContextError::TooManyRightBraces));
        assert_eq!(context.level(), 0);
        context.open_group(GroupType::Simple);
        assert_eq!(context.close_group(), Ok(vec![]));
        assert_eq!(context.close_group(), Err(ContextError::TooManyRightBraces));
    }

    #[test]
    fn typed_accessors() {
        let mut context = ScopedContext::default();
        assert_eq!(context.catcode(&'a'), CatCode::Letter);
        assert_eq!(context.sfcode(&'a'), 999);
        assert_eq!(context.mathcode(&'1'), 0x7031);
        assert_eq!(context.delcode(&'('), -1);
        assert_eq!(context.lccode(&'Q'), 'q');
        assert_eq!(context.uccode(&'q'), 'Q');
        assert_eq!(context.font(&x()), NULL_FONT);
        assert_eq!(context.glue(&x()), Glue::default());
        assert_eq!(context.interaction(), Interaction::ErrorStop);
        assert_eq!(context.namespace(), "");
        assert_eq!(context.box_register(&x()), None);
        assert_eq!(context.in_file(&x()), None);

        context.open_group(GroupType::Simple);
        context.set_catcode('@', CatCode::Letter, Scope::Local);
        context.set_interaction(Interaction::Batch, Scope::Local);
        context.set_namespace("ns".into(), Scope::Global);
        context.set_toks(x(), vec![Token::other('!')], Scope::Local);
        context.set_box_register(x(), Some(Rc::new(BoxContent::default())), Scope::Local);
        context.set_out_file(x(), Some(PathBuf::from("out.tex")), Scope::Local);
        context.set_macro_binding(
            "foo".into(),
            Some(Rc::new(Definition {
                parameter_text: vec![],
                replacement_text: vec![Token::letter('f')],
            })),
            Scope::Local,
        );
        context.set_typesetting_context(
            TypesettingContext {
                font: FontId(3),
                language: Some(1),
            },
            Scope::Local,
        );
        assert_eq!(context.catcode(&'@'), CatCode::Letter);
        assert_eq!(context.interaction(), Interaction::Batch);
        assert_eq!(context.toks(&x()), vec![Token::other('!')]);
        assert!(context.box_register(&x()).is_some());
        assert!(context.macro_binding(&"foo".into()).is_some());
        assert_eq!(context.typesetting_context().font, FontId(3));
        context.close_group().unwrap();

        assert_eq!(context.catcode(&'@'), CatCode::Other);
        assert_eq!(context.interaction(), Interaction::ErrorStop);
        assert_eq!(context.namespace(), "ns");
        assert_eq!(context.toks(&x()), vec![]);
        assert_eq!(context.box_register(&x()), None);
        assert_eq!(context.out_file(&x()), None);
        assert_eq!(context.macro_binding(&"foo".into()), None);
        assert_eq!(context.typesetting_context(), TypesettingContext::default());
    }

    #[test]
    fn observers_fire_after_assignment() {
        let mut context = ScopedContext::default();
        let log: Rc<RefCell<Vec<String>>> = Default::default();
        {
            let log = log.clone();
            context.register_observer::<Count, _>(ObserverKey::Any, move |key, value, scope| {
                log.borrow_mut().push(format!("any {key}={value} {scope:?}"))
            });
        }
        let named = {
            let log = log.clone();
            context.register_observer::<Count, _>(
                ObserverKey::Named(x()),
                move |key, value, _| log.borrow_mut().push(format!("named {key}={value}")),
            )
        };
        context.set_count(x(), 1, Scope::Local);
        context.set_count("y".into(), 2, Scope::Global);
        context.set_dimen(x(), Scaled::ONE, Scope::Local);
        assert!(context.unregister_observer::<Count>(named));
        context.set_count(x(), 3, Scope::Local);
        assert_eq!(
            *log.borrow(),
            vec![
                "named x=1",
                "any x=1 Local",
                "any y=2 Global",
                "any x=3 Local",
            ]
        );
    }

    #[test]
    fn lifecycle_events() {
        let mut context = ScopedContext::default();
        let events: Rc<RefCell<Vec<LifecycleEvent>>> = Default::default();
        {
            let events = events.clone();
            context.register_lifecycle_observer(move |event| events.borrow_mut().push(event.clone()));
        }
        context.open_group(GroupType::HBox);
        context.push_conditional(Locator::default(), true);
        assert_eq!(
            context.pop_conditional(),
            Some(Conditional {
                locator: Locator::default(),
                value: true
            })
        );
        assert_eq!(context.pop_conditional(), None);
        context.close_group().unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                LifecycleEvent::GroupOpened {
                    level: 1,
                    group_type: GroupType::HBox
                },
                LifecycleEvent::ConditionalPushed(Conditional {
                    locator: Locator::default(),
                    value: true
                }),
                LifecycleEvent::ConditionalPopped(Conditional {
                    locator: Locator::default(),
                    value: true
                }),
                LifecycleEvent::GroupClosed {
                    level: 1,
                    group_type: GroupType::HBox
                },
            ]
        );
    }

    #[test]
    fn after_group_tokens_and_actions() {
        let mut context = ScopedContext::default();
        context.open_group(GroupType::Simple);
        context.set_count(x(), 1, Scope::Local);
        context.after_group(Token::control_sequence("relax"));
        context.open_group(GroupType::Simple);
        context.after_group(Token::letter('a'));
        context.after_group_action(|context| {
            let value = context.count(&"x".into());
            context.set_count("y".into(), value + 10, Scope::Global);
        });
        assert_eq!(context.close_group(), Ok(vec![Token::letter('a')]));
        assert_eq!(context.count(&"y".into()), 11);
        assert_eq!(
            context.close_group(),
            Ok(vec![Token::control_sequence("relax")])
        );
        assert_eq!(context.count(&"y".into()), 11);
    }

    #[test]
    fn after_group_actions_in_global_group_never_run() {
        let mut context = ScopedContext::default();
        context.after_group_action(|context| context.set_count("y".into(), 1, Scope::Global));
        assert!(context.close_group().is_err());
        assert_eq!(context.count(&"y".into()), 0);
    }

    #[test]
    fn after_assignment() {
        let mut context = ScopedContext::default();
        assert_eq!(context.take_after_assignment(), None);
        context.set_after_assignment(Token::control_sequence("a"));
        context.set_after_assignment(Token::control_sequence("b"));
        assert_eq!(
            context.take_after_assignment(),
            Some(Token::control_sequence("b"))
        );
        assert_eq!(context.take_after_assignment(), None);
    }

    #[test]
    fn error_count() {
        let mut context = ScopedContext::default();
        assert_eq!(context.error_count(), 0);
        assert_eq!(context.increment_error_count(), 1);
        assert_eq!(context.increment_error_count(), 2);
        assert_eq!(context.error_count(), 2);
    }

    #[test]
    fn magnification_lock() {
        let mut context = ScopedContext::default();
        assert_eq!(context.magnification(), 1000);
        assert!(!context.is_magnification_locked());
        assert_eq!(context.set_magnification(2000), Ok(()));
        assert!(context.is_magnification_locked());
        assert_eq!(
            context.set_magnification(1000),
            Err(ContextError::IncompatibleMagnification {
                current: 2000,
                requested: 1000
            })
        );
        assert_eq!(context.set_magnification(2000), Ok(()));
        context.unlock_magnification();
        assert_eq!(context.set_magnification(1000), Ok(()));
        assert_eq!(context.magnification(), 1000);
    }

    macro_rules! illegal_magnification_tests {
        ( $( ($name: ident, $max: expr, $mag: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let mut context = ScopedContext::new(Config {
                        max_magnification: $max,
                        ..Default::default()
                    });
                    assert_eq!(context.set_magnification($mag), $want);
                }
            )+
        };
    }

    illegal_magnification_tests!(
        (
            magnification_zero,
            32768,
            0,
            Err(ContextError::IllegalMagnification {
                requested: 0,
                max: 32768
            })
        ),
        (
            magnification_negative,
            32768,
            -5,
            Err(ContextError::IllegalMagnification {
                requested: -5,
                max: 32768
            })
        ),
        (magnification_max, 32768, 32768, Ok(())),
        (
            magnification_above_configured_max,
            5000,
            5001,
            Err(ContextError::IllegalMagnification {
                requested: 5001,
                max: 5000
            })
        ),
        (magnification_one, 5000, 1, Ok(())),
    );

    #[test]
    fn illegal_magnification_locks_the_current_value() {
        let mut context = ScopedContext::default();
        assert!(context.set_magnification(0).is_err());
        assert!(context.is_magnification_locked());
        assert_eq!(context.magnification(), 1000);
        assert_eq!(
            context.set_magnification(2000),
            Err(ContextError::IncompatibleMagnification {
                current: 1000,
                requested: 2000
            })
        );
        assert_eq!(context.set_magnification(1000), Ok(()));
    }

    #[test]
    fn marks_belong_to_the_run() {
        let mut context = ScopedContext::default();
        context.open_group(GroupType::Output);
        context
            .marks_mut()
            .set_mark("", vec![Token::letter('m')]);
        context.close_group().unwrap();
        assert_eq!(
            context.marks().bottom_mark(""),
            Some(&vec![Token::letter('m')])
        );
        context.marks_mut().reset();
        assert_eq!(context.marks().bottom_mark(""), None);
    }
}
