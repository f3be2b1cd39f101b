//! The capabilities a share action needs from its host.
//!
//! Every capability is looked up when it's needed rather than once at startup: a browser may
//! grant or revoke them between two clicks.

use url::Url;

use crate::message::ShareMessage;

/// Read-only access to the page a share action runs on.
pub trait Page {
    /// The displayed text of the element matching `selector`, if there is one.
    fn text_content(&self, selector: &str) -> Option<String>;

    /// The page's current address.
    fn location(&self) -> Result<Url, PageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page has no field matching `{selector}`")]
    MissingField { selector: String },

    #[error("page address is unreadable: {0}")]
    UnreadableLocation(String),

    #[error("page address is not a valid url: {0}")]
    InvalidLocation(#[from] url::ParseError),
}

impl PageError {
    pub fn missing_field(selector: impl Into<String>) -> Self {
        Self::MissingField {
            selector: selector.into(),
        }
    }
}

/// Whether the host offers a capability right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Capability<T> {
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(..))
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

/// How a native share flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,

    /// The user dismissed the share sheet.
    Cancelled,

    Failed(String),
}

/// Maps a finished share call to its outcome, keyed on the name of the error it was
/// rejected with.
///
/// Only `AbortError` means the user closed the sheet; every other rejection is a failure.
impl From<Result<(), String>> for ShareOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Shared,
            Err(name) if name == "AbortError" => Self::Cancelled,
            Err(name) => Self::Failed(name),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait NativeShare {
    /// Whether the share sheet would accept this payload.
    fn can_share(&self, message: &ShareMessage) -> bool;

    /// Opens the share sheet and waits until the user is done with it.
    async fn share(&self, message: &ShareMessage) -> ShareOutcome;
}

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
#[error("clipboard rejected the write: {reason}")]
pub struct ClipboardError {
    reason: String,
}

impl ClipboardError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// State of the user activation that started the current flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserActivation {
    Active,
    Expired,
    Unsupported,
}

impl UserActivation {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for UserActivation {
    fn from(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Expired
        }
    }
}

/// `None` when the host can't tell whether the user is interacting with the page.
impl From<Option<bool>> for UserActivation {
    fn from(active: Option<bool>) -> Self {
        active.map_or(Self::Unsupported, Self::from)
    }
}

pub trait Platform {
    type Share: NativeShare;
    type Clipboard: Clipboard;

    fn native_share(&self) -> Capability<Self::Share>;

    fn clipboard(&self) -> Capability<Self::Clipboard>;

    fn user_activation(&self) -> UserActivation;

    /// Shows a short confirmation to the user.
    fn notify(&self, notice: &str);

    /// Shows a blocking prompt pre-filled with `value`, for the user to copy by hand.
    fn prompt(&self, message: &str, value: &str);
}

#[cfg(test)]
pub(crate) mod fake {
    //! A scriptable [`Platform`] that records what it was asked to do.

    use std::{cell::RefCell, rc::Rc};

    use super::{
        Capability, Clipboard, ClipboardError, NativeShare, Platform, ShareOutcome,
        UserActivation,
    };
    use crate::message::ShareMessage;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect {
        ShareSheet { title: String, url: String },
        ClipboardWrite(String),
        Notice(String),
        Prompt { message: String, value: String },
    }

    type Effects = Rc<RefCell<Vec<Effect>>>;

    #[derive(Clone)]
    pub struct FakeShare {
        accepts: bool,
        outcome: ShareOutcome,
        effects: Effects,
    }

    impl NativeShare for FakeShare {
        fn can_share(&self, _message: &ShareMessage) -> bool {
            self.accepts
        }

        async fn share(&self, message: &ShareMessage) -> ShareOutcome {
            self.effects.borrow_mut().push(Effect::ShareSheet {
                title: message.title.clone(),
                url: message.url.to_string(),
            });
            self.outcome.clone()
        }
    }

    #[derive(Clone)]
    pub struct FakeClipboard {
        rejects: bool,
        effects: Effects,
    }

    impl Clipboard for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.rejects {
                return Err(ClipboardError::new("document is not focused"));
            }

            self.effects
                .borrow_mut()
                .push(Effect::ClipboardWrite(text.to_owned()));
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakePlatform {
        share: Option<(bool, ShareOutcome)>,
        clipboard: Option<bool>,
        activation: Option<bool>,
        effects: Effects,
    }

    impl FakePlatform {
        /// A platform with nothing but the prompt.
        pub fn bare() -> Self {
            Self::default()
        }

        pub fn with_share(mut self, accepts: bool, outcome: ShareOutcome) -> Self {
            self.share = Some((accepts, outcome));
            self
        }

        pub fn with_clipboard(mut self) -> Self {
            self.clipboard = Some(false);
            self
        }

        pub fn with_rejecting_clipboard(mut self) -> Self {
            self.clipboard = Some(true);
            self
        }

        pub fn with_activation(mut self, active: bool) -> Self {
            self.activation = Some(active);
            self
        }

        pub fn effects(&self) -> Vec<Effect> {
            self.effects.borrow().clone()
        }
    }

    impl Platform for FakePlatform {
        type Share = FakeShare;
        type Clipboard = FakeClipboard;

        fn native_share(&self) -> Capability<FakeShare> {
            self.share
                .clone()
                .map(|(accepts, outcome)| FakeShare {
                    accepts,
                    outcome,
                    effects: self.effects.clone(),
                })
                .into()
        }

        fn clipboard(&self) -> Capability<FakeClipboard> {
            self.clipboard
                .map(|rejects| FakeClipboard {
                    rejects,
                    effects: self.effects.clone(),
                })
                .into()
        }

        fn user_activation(&self) -> UserActivation {
            self.activation.into()
        }

        fn notify(&self, notice: &str) {
            self.effects
                .borrow_mut()
                .push(Effect::Notice(notice.to_owned()));
        }

        fn prompt(&self, message: &str, value: &str) {
            self.effects.borrow_mut().push(Effect::Prompt {
                message: message.to_owned(),
                value: value.to_owned(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Capability, PageError, ShareOutcome, UserActivation};

    #[test]
    fn capability_from_option() {
        assert_eq!(Capability::from(Some(3)), Capability::Available(3));
        assert_eq!(Capability::<u8>::from(None), Capability::Unavailable);
        assert!(Capability::Available("x").is_available());
        assert!(!Capability::<()>::Unavailable.is_available());
    }

    #[test]
    fn activation_from_bool() {
        assert!(UserActivation::from(true).is_active());
        assert!(!UserActivation::from(false).is_active());
        assert!(!UserActivation::Unsupported.is_active());
    }

    #[test]
    fn activation_without_support() {
        assert_eq!(UserActivation::from(Some(true)), UserActivation::Active);
        assert_eq!(UserActivation::from(Some(false)), UserActivation::Expired);
        assert_eq!(UserActivation::from(None), UserActivation::Unsupported);
    }

    #[test]
    fn share_outcome_from_rejection() {
        assert_eq!(ShareOutcome::from(Ok::<_, String>(())), ShareOutcome::Shared);
        assert_eq!(
            ShareOutcome::from(Err::<(), _>("AbortError".to_owned())),
            ShareOutcome::Cancelled
        );
        assert_eq!(
            ShareOutcome::from(Err::<(), _>("NotAllowedError".to_owned())),
            ShareOutcome::Failed("NotAllowedError".to_owned())
        );
        // names are matched exactly
        assert_eq!(
            ShareOutcome::from(Err::<(), _>("aborterror".to_owned())),
            ShareOutcome::Failed("aborterror".to_owned())
        );
    }

    #[test]
    fn page_error_messages() {
        assert_eq!(
            PageError::missing_field("#player-name").to_string(),
            "page has no field matching `#player-name`"
        );

        let invalid = url::Url::parse("not a url").expect_err("hard-coded invalid url");
        assert_eq!(
            PageError::from(invalid).to_string(),
            "page address is not a valid url: relative URL without a base"
        );
    }
}
