pub mod de;
pub mod pagination;
pub mod response;

pub use de::opt_from_str;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery, normalize_page};
pub use response::ApiResponse;
