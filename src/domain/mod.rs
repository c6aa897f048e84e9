pub mod announcement;
pub mod blog;
pub mod event;
pub mod member;
pub mod registration;
pub mod report;
pub mod resource;
pub mod testimonial;

pub use announcement::*;
pub use blog::*;
pub use event::*;
pub use member::*;
pub use registration::*;
pub use report::*;
pub use resource::*;
pub use testimonial::*;
