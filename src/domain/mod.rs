mod detail;
mod fixture;
mod page;
mod run;

pub use detail::{MatchDetail, MatchInfo, MatchStaff};
pub use fixture::{MatchStub, Venue};
pub use page::{Anchor, CrestImage, DetailBlock, LayoutOrientation};
pub use run::{MatchesByDate, ScrapeRun, UNKNOWN_DATE_KEY};
