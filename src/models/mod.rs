mod document;
mod object_id;
mod resource;
mod tour;
mod user;

pub use document::{Attributes, Document, DocumentRow, Filter, NewDocumentRow};
pub use object_id::{InvalidObjectId, ObjectId};
pub use resource::{Resource, ResourceKind, display_name};
pub use tour::Tour;
pub use user::User;
