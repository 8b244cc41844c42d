pub mod assignments;

pub mod auth;

pub mod courses;

pub mod lessons;

pub mod revenue;

pub mod slots;

pub mod songs;

pub mod submissions;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use lessons::configure_lesson_routes;
pub use revenue::configure_revenue_routes;
pub use slots::configure_slot_routes;
pub use songs::configure_song_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;
