use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::api::{rejection_message, ApiError, BookingApi};
use super::session::{AuthResponse, SessionEvent, SessionStore};

pub const BRANCH_CHOICES: [(&str, &str); 5] = [
    ("CSE", "Computer Science Engineering"),
    ("AIML", "Artificial Intelligence and Machine Learning"),
    ("DS", "Data Science"),
    ("CS", "Cyber Security"),
    ("IT", "Information Technology"),
];

pub const COURSE_CHOICES: [(&str, &str); 7] = [
    ("BTECH", "Bachelor of Technology"),
    ("BBA", "Bachelor of Business Administration"),
    ("BARCH", "Bachelor of Architecture"),
    ("BA", "Bachelor of Arts"),
    ("BDES", "Bachelor of Design"),
    ("LLB", "Bachelor of Laws"),
    ("MBA", "Master of Business Administration"),
];

const REGISTER_ERROR_FIELDS: [(&str, &str); 3] = [
    ("username", "Username"),
    ("email", "Email"),
    ("password", "Password"),
];

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static MOBILE_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn mobile_re() -> &'static Regex {
    MOBILE_RE.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("mobile pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub mobile: String,
    pub branch: String,
    pub course: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
    pub agree_terms: bool,
}

impl SignInForm {
    /// First problem with the form, if any.
    pub fn validate(&self) -> Result<LoginRequest, String> {
        if self.email.is_empty() {
            return Err("Email is required".into());
        }
        if !self.email.contains('@') {
            return Err("Please enter a valid email address".into());
        }
        if self.password.is_empty() {
            return Err("Password is required".into());
        }
        if !self.agree_terms {
            return Err("Please agree to the Terms and Conditions".into());
        }
        Ok(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub request: RegisterRequest,
    pub agree_terms: bool,
}

/// `full_name` -> `Full Name`, `password2` -> `Password2`.
fn field_title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl SignUpForm {
    pub fn validate(&self) -> Result<RegisterRequest, String> {
        let r = &self.request;
        let required = [
            ("username", &r.username),
            ("email", &r.email),
            ("full_name", &r.full_name),
            ("mobile", &r.mobile),
            ("branch", &r.branch),
            ("course", &r.course),
            ("password", &r.password),
            ("password2", &r.password2),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(format!("{} is required", field_title(field)));
        }
        if !email_re().is_match(&r.email) {
            return Err("Please enter a valid email address".into());
        }
        if !mobile_re().is_match(&r.mobile) {
            return Err("Please enter a valid mobile number (10-15 digits)".into());
        }
        if r.password.chars().count() < 8 {
            return Err("Password must be at least 8 characters long".into());
        }
        if r.password != r.password2 {
            return Err("Passwords do not match".into());
        }
        if !self.agree_terms {
            return Err("Please agree to the Terms and Conditions".into());
        }
        Ok(r.clone())
    }
}

fn network_message() -> String {
    "Network error. Please check your connection.".to_string()
}

pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected { body, .. } => rejection_message(body, &[], "Login failed"),
        ApiError::Unauthorized => "Login failed".to_string(),
        ApiError::Network(_) => network_message(),
        ApiError::MissingToken | ApiError::Decode(_) => "Login failed".to_string(),
    }
}

pub fn register_error_message(err: &ApiError) -> String {
    const FALLBACK: &str = "Registration failed. Please check your information.";
    match err {
        ApiError::Rejected { body, .. } => {
            // `detail` is not consulted for registration
            let mut trimmed = body.clone();
            if let Some(map) = trimmed.as_object_mut() {
                map.remove("detail");
            }
            rejection_message(&trimmed, &REGISTER_ERROR_FIELDS, FALLBACK)
        }
        ApiError::Network(_) => network_message(),
        _ => FALLBACK.to_string(),
    }
}

/// Validate, call `auth/login/` and persist the session.
pub async fn sign_in<A: BookingApi>(
    api: &A,
    session: &SessionStore,
    form: &SignInForm,
) -> Result<AuthResponse, String> {
    let request = form.validate()?;
    match api.login(&request).await {
        Ok(auth) => {
            session.sign_in(&auth, form.remember_me);
            log::info!("signed in as {}", auth.user.display_name());
            Ok(auth)
        }
        Err(err) => {
            log::warn!("login failed: {}", err);
            Err(login_error_message(&err))
        }
    }
}

/// Validate, call `auth/register/` and persist the session.
pub async fn register<A: BookingApi>(
    api: &A,
    session: &SessionStore,
    form: &SignUpForm,
) -> Result<AuthResponse, String> {
    let request = form.validate()?;
    match api.register(&request).await {
        Ok(auth) => {
            session.sign_in(&auth, false);
            log::info!("registered {}", auth.user.display_name());
            Ok(auth)
        }
        Err(err) => {
            log::warn!("registration failed: {}", err);
            Err(register_error_message(&err))
        }
    }
}

pub fn sign_out(session: &SessionStore) {
    session.clear(SessionEvent::SignedOut);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled_sign_up() -> SignUpForm {
        SignUpForm {
            request: RegisterRequest {
                username: "asha".into(),
                email: "asha@example.com".into(),
                full_name: "Asha Rao".into(),
                mobile: "9876543210".into(),
                branch: "CSE".into(),
                course: "BTECH".into(),
                password: "hunter2hunter2".into(),
                password2: "hunter2hunter2".into(),
            },
            agree_terms: true,
        }
    }

    #[test]
    fn sign_in_validation_order() {
        let mut form = SignInForm::default();
        assert_eq!(form.validate().unwrap_err(), "Email is required");
        form.email = "asha".into();
        assert_eq!(form.validate().unwrap_err(), "Please enter a valid email address");
        form.email = "asha@example.com".into();
        assert_eq!(form.validate().unwrap_err(), "Password is required");
        form.password = "secret".into();
        assert_eq!(form.validate().unwrap_err(), "Please agree to the Terms and Conditions");
        form.agree_terms = true;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn sign_up_required_fields_use_titles() {
        let mut form = filled_sign_up();
        form.request.full_name.clear();
        assert_eq!(form.validate().unwrap_err(), "Full Name is required");

        let mut form = filled_sign_up();
        form.request.password2.clear();
        assert_eq!(form.validate().unwrap_err(), "Password2 is required");
    }

    #[test]
    fn sign_up_format_checks() {
        let mut form = filled_sign_up();
        form.request.email = "asha@example".into();
        assert_eq!(form.validate().unwrap_err(), "Please enter a valid email address");

        let mut form = filled_sign_up();
        form.request.mobile = "12345".into();
        assert_eq!(
            form.validate().unwrap_err(),
            "Please enter a valid mobile number (10-15 digits)"
        );

        let mut form = filled_sign_up();
        form.request.password = "short".into();
        form.request.password2 = "short".into();
        assert_eq!(
            form.validate().unwrap_err(),
            "Password must be at least 8 characters long"
        );

        let mut form = filled_sign_up();
        form.request.password2 = "different-password".into();
        assert_eq!(form.validate().unwrap_err(), "Passwords do not match");

        let mut form = filled_sign_up();
        form.agree_terms = false;
        assert_eq!(form.validate().unwrap_err(), "Please agree to the Terms and Conditions");

        assert!(filled_sign_up().validate().is_ok());
    }

    #[test]
    fn registration_errors_are_prefixed_by_field() {
        let taken = ApiError::Rejected {
            status: 400,
            body: json!({"username": ["already taken"]}),
        };
        assert_eq!(register_error_message(&taken), "Username: already taken");

        let both = ApiError::Rejected {
            status: 400,
            body: json!({"password": ["too common"], "email": ["invalid"]}),
        };
        assert_eq!(register_error_message(&both), "Email: invalid");

        let detail_only = ApiError::Rejected {
            status: 400,
            body: json!({"detail": "ignored"}),
        };
        assert_eq!(
            register_error_message(&detail_only),
            "Registration failed. Please check your information."
        );
    }

    #[test]
    fn login_errors_prefer_detail() {
        let rejected = ApiError::Rejected {
            status: 400,
            body: json!({"detail": "No active account found"}),
        };
        assert_eq!(login_error_message(&rejected), "No active account found");
        assert_eq!(
            login_error_message(&ApiError::Rejected { status: 500, body: json!(null) }),
            "Login failed"
        );
    }
}
