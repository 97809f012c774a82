//! Store outcome taxonomy.

use serde::Serialize;
use std::fmt;

/// Outcome of a single store operation, derived from the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// 200.
    Ok,
    /// 201.
    Created,
    /// 204.
    NoContent,
    /// 206.
    PartialContent,
    /// Credentials were not supplied.
    AuthMissing,
    /// 400.
    BadRequest,
    /// 401.
    Unauthorized,
    /// 403.
    Forbidden,
    /// 404.
    NotFound,
    /// 409.
    Conflict,
    /// 413.
    FileTooLarge,
    /// 414.
    RequestTooLarge,
    /// 416.
    RequestRangeInvalid,
    /// 500.
    InternalError,
    /// Service unavailable.
    Unavailable,
    /// Any status code not listed above.
    OtherFailure,
}

impl Status {
    /// Every status value, in declaration order.
    pub const ALL: [Status; 16] = [
        Status::Ok,
        Status::Created,
        Status::NoContent,
        Status::PartialContent,
        Status::AuthMissing,
        Status::BadRequest,
        Status::Unauthorized,
        Status::Forbidden,
        Status::NotFound,
        Status::Conflict,
        Status::FileTooLarge,
        Status::RequestTooLarge,
        Status::RequestRangeInvalid,
        Status::InternalError,
        Status::Unavailable,
        Status::OtherFailure,
    ];

    /// Map an HTTP status code to a store outcome.
    ///
    /// Total over `u16`: codes outside the known table fall to
    /// [`Status::OtherFailure`].
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => Status::Ok,
            201 => Status::Created,
            204 => Status::NoContent,
            206 => Status::PartialContent,
            400 => Status::BadRequest,
            401 => Status::Unauthorized,
            403 => Status::Forbidden,
            404 => Status::NotFound,
            409 => Status::Conflict,
            413 => Status::FileTooLarge,
            414 => Status::RequestTooLarge,
            416 => Status::RequestRangeInvalid,
            500 => Status::InternalError,
            _ => Status::OtherFailure,
        }
    }

    /// Whether this outcome counts as a success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Status::Ok | Status::Created | Status::PartialContent | Status::NoContent
        )
    }

    /// Wire name of the status, as written into output rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Created => "CREATED",
            Status::NoContent => "NO_CONTENT",
            Status::PartialContent => "PARTIAL_CONTENT",
            Status::AuthMissing => "AUTH_MISSING",
            Status::BadRequest => "BAD_REQUEST",
            Status::Unauthorized => "UNAUTHORIZED",
            Status::Forbidden => "FORBIDDEN",
            Status::NotFound => "NOT_FOUND",
            Status::Conflict => "CONFLICT",
            Status::FileTooLarge => "FILE_TOO_LARGE",
            Status::RequestTooLarge => "REQUEST_TOO_LARGE",
            Status::RequestRangeInvalid => "REQUEST_RANGE_INVALID",
            Status::InternalError => "INTERNAL_ERROR",
            Status::Unavailable => "UNAVAILABLE",
            Status::OtherFailure => "OTHER_FAILURE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an HTTP status code to a store outcome.
pub fn classify(code: u16) -> Status {
    Status::from_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(200, Status::Ok)]
    #[test_case(201, Status::Created)]
    #[test_case(204, Status::NoContent)]
    #[test_case(206, Status::PartialContent)]
    #[test_case(400, Status::BadRequest)]
    #[test_case(401, Status::Unauthorized)]
    #[test_case(403, Status::Forbidden)]
    #[test_case(404, Status::NotFound)]
    #[test_case(409, Status::Conflict)]
    #[test_case(413, Status::FileTooLarge)]
    #[test_case(414, Status::RequestTooLarge)]
    #[test_case(416, Status::RequestRangeInvalid)]
    #[test_case(500, Status::InternalError)]
    fn test_known_codes(code: u16, expected: Status) {
        assert_eq!(classify(code), expected);
    }

    #[test_case(0)]
    #[test_case(202)]
    #[test_case(302)]
    #[test_case(405)]
    #[test_case(503)]
    #[test_case(u16::MAX)]
    fn test_unknown_codes_fall_through(code: u16) {
        assert_eq!(classify(code), Status::OtherFailure);
    }

    #[test]
    fn test_success_set() {
        let successes: Vec<Status> = Status::ALL
            .iter()
            .copied()
            .filter(|s| s.is_success())
            .collect();
        assert_eq!(
            successes,
            vec![
                Status::Ok,
                Status::Created,
                Status::NoContent,
                Status::PartialContent
            ]
        );
    }

    #[test]
    fn test_display_and_serialize_use_wire_names() {
        assert_eq!(Status::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(
            serde_json::to_string(&Status::RequestRangeInvalid).unwrap(),
            "\"REQUEST_RANGE_INVALID\""
        );
        for status in Status::ALL {
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{}\"", status.as_str())
            );
        }
    }

    proptest! {
        #[test]
        fn prop_classify_is_total_and_consistent(code in any::<u16>()) {
            let status = classify(code);
            let known = [200u16, 201, 204, 206, 400, 401, 403, 404, 409, 413, 414, 416, 500];
            if known.contains(&code) {
                prop_assert_ne!(status, Status::OtherFailure);
            } else {
                prop_assert_eq!(status, Status::OtherFailure);
            }
            prop_assert_eq!(status.is_success(), matches!(code, 200 | 201 | 204 | 206));
        }
    }
}
