use chrono::NaiveDate;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::auth::{LoginRequest, RegisterRequest};
use super::booking::{AvailabilityMap, AvailableCourts, BookingList, BookingRecord, NewBooking};
use super::catalog::{Sport, TimeSlot};
use super::session::AuthResponse;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("no access token stored")]
    MissingToken,

    #[error("access token rejected")]
    Unauthorized,

    #[error("request rejected with status {status}")]
    Rejected { status: u16, body: Value },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Pick the message to show for a rejected request.
///
/// Looks at `fields` in order (`"Label: first error"`), then
/// `non_field_errors`, then `detail`, then falls back.
pub fn rejection_message(body: &Value, fields: &[(&str, &str)], fallback: &str) -> String {
    for (field, label) in fields {
        if let Some(message) = first_message(body.get(*field)) {
            return format!("{}: {}", label, message);
        }
    }
    if let Some(message) = first_message(body.get("non_field_errors")) {
        return message;
    }
    if let Some(message) = first_message(body.get("detail")) {
        return message;
    }
    fallback.to_string()
}

fn first_message(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(message) => Some(message.clone()),
        Value::Array(messages) => messages.first().and_then(|m| m.as_str()).map(str::to_string),
        _ => None,
    }
}

/// The booking service as seen by the front end.
#[allow(async_fn_in_trait)]
pub trait BookingApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<BookingRecord>>;

    /// Slot value -> free on any court, for a sport and day.
    async fn available_timeslots(
        &self,
        token: &str,
        sport: Sport,
        date: NaiveDate,
    ) -> ApiResult<AvailabilityMap>;

    async fn available_courts(
        &self,
        token: &str,
        sport: Sport,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> ApiResult<AvailableCourts>;

    async fn create_booking(&self, token: &str, booking: &NewBooking) -> ApiResult<BookingRecord>;
}

#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: Client,
    base_url: Url,
}

impl HttpBookingApi {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api/`. A
    /// trailing slash is added when missing so relative joins keep the path.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::Network(format!("invalid base url '{}': {}", base_url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid path '{}': {}", path, e)))
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(failure(status, token.is_some(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// A 401 only means an expired session when a token was sent; login and
/// registration keep the body so its `detail` can be shown.
fn failure(status: StatusCode, authenticated: bool, text: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED && authenticated {
        return ApiError::Unauthorized;
    }
    ApiError::Rejected {
        status: status.as_u16(),
        body: serde_json::from_str(text).unwrap_or(Value::Null),
    }
}

fn availability_query(sport: Sport, date: NaiveDate) -> String {
    format!(
        "sport={}&date={}",
        urlencoding::encode(sport.value()),
        urlencoding::encode(&date.format("%Y-%m-%d").to_string())
    )
}

impl BookingApi for HttpBookingApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.send(Method::POST, "auth/login/", None, Some(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.send(Method::POST, "auth/register/", None, Some(request)).await
    }

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<BookingRecord>> {
        let list: BookingList = self
            .send::<(), _>(Method::GET, "bookings/", Some(token), None)
            .await?;
        Ok(list.into_records())
    }

    async fn available_timeslots(
        &self,
        token: &str,
        sport: Sport,
        date: NaiveDate,
    ) -> ApiResult<AvailabilityMap> {
        let path = format!("bookings/available_timeslots/?{}", availability_query(sport, date));
        self.send::<(), _>(Method::GET, &path, Some(token), None).await
    }

    async fn available_courts(
        &self,
        token: &str,
        sport: Sport,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> ApiResult<AvailableCourts> {
        let path = format!(
            "bookings/available_courts/?{}&time_slot={}",
            availability_query(sport, date),
            urlencoding::encode(&slot.value())
        );
        self.send::<(), _>(Method::GET, &path, Some(token), None).await
    }

    async fn create_booking(&self, token: &str, booking: &NewBooking) -> ApiResult<BookingRecord> {
        self.send(Method::POST, "bookings/", Some(token), Some(booking)).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use serde_json::json;

    use super::*;

    #[test]
    fn field_errors_win_over_generic_ones() {
        let body = json!({
            "detail": "nope",
            "non_field_errors": ["slot taken"],
            "time_slot": ["Time slot is full."]
        });
        let message = rejection_message(&body, &[("time_slot", "Time slot")], "fallback");
        assert_eq!(message, "Time slot: Time slot is full.");
    }

    #[test]
    fn non_field_then_detail_then_fallback() {
        let both = json!({"detail": "Not allowed", "non_field_errors": ["Already booked"]});
        assert_eq!(rejection_message(&both, &[], "fallback"), "Already booked");

        let detail = json!({"detail": "Not allowed"});
        assert_eq!(rejection_message(&detail, &[], "fallback"), "Not allowed");

        assert_eq!(rejection_message(&Value::Null, &[], "fallback"), "fallback");
        assert_eq!(rejection_message(&json!({"detail": 42}), &[], "fallback"), "fallback");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = HttpBookingApi::new("http://localhost:8000/api").unwrap();
        assert_eq!(
            api.url("bookings/").unwrap().as_str(),
            "http://localhost:8000/api/bookings/"
        );
    }

    #[test]
    fn query_values_are_encoded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            availability_query(Sport::Badminton, date),
            "sport=badminton&date=2024-01-01"
        );
        assert_eq!(urlencoding::encode("9:00"), "9%3A00");
    }

    #[test]
    fn unauthorized_depends_on_token() {
        let text = r#"{"detail": "No active account found with the given credentials"}"#;
        assert_eq!(failure(StatusCode::UNAUTHORIZED, true, text), ApiError::Unauthorized);
        assert_eq!(
            failure(StatusCode::UNAUTHORIZED, false, text),
            ApiError::Rejected {
                status: 401,
                body: json!({"detail": "No active account found with the given credentials"}),
            }
        );
        assert_eq!(
            failure(StatusCode::INTERNAL_SERVER_ERROR, true, "<html>"),
            ApiError::Rejected { status: 500, body: Value::Null }
        );
    }

    /// Answer exactly one request on a local socket with `response`.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
                    continue;
                };
                let head = String::from_utf8_lossy(&received[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= end + 4 + length {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}/api/", addr)
    }

    #[tokio::test]
    async fn failed_login_keeps_server_detail() {
        let body = r#"{"detail":"No active account found with the given credentials"}"#;
        let response = format!(
            "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let api = HttpBookingApi::new(&serve_once(response)).unwrap();
        let request = LoginRequest {
            email: "asha@example.com".into(),
            password: "wrong".into(),
        };

        let err = api.login(&request).await.unwrap_err();
        assert_eq!(
            crate::data::auth::login_error_message(&err),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(HttpBookingApi::new("not a url").is_err());
    }
}
