pub mod announcements;
pub mod blog;
pub mod events;
pub mod members;
pub mod public;
pub mod registrations;
pub mod reports;
pub mod resources;
pub mod root;
pub mod testimonials;
