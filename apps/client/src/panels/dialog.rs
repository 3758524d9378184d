/// Yes/no gate in front of an overwriting action.
///
/// The dialog only knows whether it is open and what it says. The action
/// itself is handed in by the caller at confirm time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    open: bool,
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_text: &'static str,
    pub cancel_text: &'static str,
}

impl ConfirmDialog {
    pub fn new(title: &'static str, message: &'static str) -> Self {
        Self {
            open: false,
            title,
            message,
            confirm_text: "Yes",
            cancel_text: "No",
        }
    }

    pub fn with_buttons(mut self, confirm_text: &'static str, cancel_text: &'static str) -> Self {
        self.confirm_text = confirm_text;
        self.cancel_text = cancel_text;
        self
    }

    /// The overwrite prompt shared by every "save to profile" action.
    pub fn replace_profile_resume() -> Self {
        Self::new(
            "Replace Existing Resume?",
            "You already have a resume saved in your profile. Do you want to replace it with this newly created one?",
        )
        .with_buttons("Yes, Replace", "No, Keep Current")
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Runs `action` once and closes. A closed dialog runs nothing.
    pub fn confirm<T>(&mut self, action: impl FnOnce() -> T) -> Option<T> {
        if !self.open {
            return None;
        }
        let out = action();
        self.open = false;
        Some(out)
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// The close control; same effect as cancel.
    pub fn dismiss(&mut self) {
        self.cancel();
    }
}
