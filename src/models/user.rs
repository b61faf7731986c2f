use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ResourceKind;

/// User attributes, used both as the request body and the stored shape.
///
/// `email` is unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct User {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, max = 32, message = "Phone number must be between 5 and 32 characters"))]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub membership_status: Option<String>,
}

impl ResourceKind for User {
    const NAME: &'static str = "user";
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_user_deserializes() {
        let user: User = serde_json::from_value(json!({
            "name": "Matti",
            "email": "matti@example.com",
            "phoneNumber": "+358401234567",
            "gender": "male",
            "dateOfBirth": "1990-04-12",
            "membershipStatus": "active"
        }))
        .unwrap();

        assert!(user.validate().is_ok());
        assert_eq!(user.date_of_birth, Some(jiff::civil::date(1990, 4, 12)));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let user: User =
            serde_json::from_value(json!({"name": "Matti", "email": "nope"})).unwrap();
        let errors = user.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_snake_case_field_is_unknown() {
        let result = serde_json::from_value::<User>(json!({
            "name": "Matti",
            "email": "matti@example.com",
            "phone_number": "12345"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_email_is_unique_field() {
        assert_eq!(User::UNIQUE_FIELDS, &["email"]);
        assert_eq!(User::COLLECTION, "users");
    }
}
