pub mod error;
pub mod traits;
pub mod types;

pub use error::Error;
pub use traits::SdeApi;
pub use types::{
    CountermeasureFilter, CountermeasureId, CountermeasureUpdate, ProjectFilter, ProjectId,
};
