use cropcare_core::validation::{
    MatchState, PasswordStrength, check_registration, evaluate_password_strength,
    is_form_submittable, match_state,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

impl AuthTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Confirm,
}

/// Login/registration form.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub tab: AuthTab,
    pub focus: AuthField,
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub show_password: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            tab: AuthTab::Login,
            focus: AuthField::Username,
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            show_password: false,
            submitting: false,
            error: None,
            success: None,
        }
    }

    fn fields(&self) -> &'static [AuthField] {
        match self.tab {
            AuthTab::Login => &[AuthField::Username, AuthField::Password],
            AuthTab::Register => &[AuthField::Username, AuthField::Password, AuthField::Confirm],
        }
    }

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        };
        self.focus = AuthField::Username;
        self.password.clear();
        self.confirm.clear();
        self.error = None;
        self.success = None;
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
        self.error = None;
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
        self.error = None;
    }

    pub fn strength(&self) -> PasswordStrength {
        evaluate_password_strength(&self.password)
    }

    pub fn match_state(&self) -> MatchState {
        match_state(&self.password, &self.confirm)
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        if self.submitting {
            return false;
        }
        match self.tab {
            AuthTab::Login => !self.username.is_empty() && !self.password.is_empty(),
            AuthTab::Register => is_form_submittable(&self.username, &self.password, &self.confirm),
        }
    }

    /// Check the form before sending. On failure the message is kept for
    /// inline display.
    pub fn validate(&mut self) -> bool {
        if self.tab == AuthTab::Register {
            if let Err(e) = check_registration(&self.password, &self.confirm) {
                self.error = Some(e.to_string());
                return false;
            }
        }
        if !self.can_submit() {
            self.error = Some("Please fill in all fields.".to_string());
            return false;
        }
        true
    }

    /// Text shown for a password field.
    pub fn masked(&self, value: &str) -> String {
        if self.show_password {
            value.to_string()
        } else {
            "•".repeat(value.chars().count())
        }
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(form: &mut AuthForm, s: &str) {
        for c in s.chars() {
            form.push(c);
        }
    }

    #[test]
    fn login_cycles_two_fields() {
        let mut form = AuthForm::new();
        form.next_field();
        assert_eq!(form.focus, AuthField::Password);
        form.next_field();
        assert_eq!(form.focus, AuthField::Username);
        form.prev_field();
        assert_eq!(form.focus, AuthField::Password);
    }

    #[test]
    fn register_requires_strong_matching_password() {
        let mut form = AuthForm::new();
        form.switch_tab();
        typed(&mut form, "farmer");
        form.next_field();
        typed(&mut form, "weakpass");
        form.next_field();
        typed(&mut form, "weakpass");
        assert!(!form.can_submit());
        assert!(!form.validate());
        assert!(form.error.is_some());

        form.password = "Str0ng!pass".into();
        form.confirm = "Str0ng!pass".into();
        assert!(form.can_submit());
        assert!(form.validate());
    }

    #[test]
    fn mismatch_message_wins() {
        let mut form = AuthForm::new();
        form.switch_tab();
        form.username = "farmer".into();
        form.password = "Str0ng!pass".into();
        form.confirm = "Str0ng!pasz".into();
        assert!(!form.validate());
        assert_eq!(form.error.as_deref(), Some("Passwords do not match."));
    }

    #[test]
    fn passwords_masked_until_revealed() {
        let mut form = AuthForm::new();
        assert_eq!(form.masked("abc"), "•••");
        form.show_password = true;
        assert_eq!(form.masked("abc"), "abc");
    }
}
