pub mod debounce;
pub mod item;
pub mod page;
pub mod route;
pub mod screen;
pub mod session;
pub mod upload;
pub mod view;

pub use debounce::Debouncer;
pub use item::ResultItem;
pub use page::{HasMorePolicy, Page, PageRequest, PageResponse, merge_pages, origin_label};
pub use route::Route;
pub use screen::{EmptyQueryPolicy, ScreenError, ScreenSpec, TitleRule};
pub use session::{
	Cursor, FetchCommand, FetchFailure, SearchEvent, SearchState, SessionRules, SessionToken, reduce,
};
pub use upload::UploadName;
pub use view::{Card, Group, LoadMore, SearchView, group_by_origin};
