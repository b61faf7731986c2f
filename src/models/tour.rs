use serde::{Deserialize, Serialize};
use serde_json::Number;
use validator::{Validate, ValidationError};

use crate::models::ResourceKind;

/// Tour attributes, used both as the request body and the stored shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tour {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "Info must be at most 5000 characters"))]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
    /// Kept as a JSON number so `120` round-trips as `120`, not `120.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Number>,
}

fn validate_price(price: &Number) -> Result<(), ValidationError> {
    match price.as_f64() {
        Some(value) if value >= 0.0 => Ok(()),
        _ => Err(ValidationError::new("range").with_message("Price cannot be negative".into())),
    }
}

impl ResourceKind for Tour {
    const NAME: &'static str = "tour";
    const COLLECTION: &'static str = "tours";
}
