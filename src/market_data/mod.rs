// =============================================================================
// Market data collaborators
// =============================================================================
//
// Where raw daily bars come from. The engine only sees the `BarSource` seam;
// concrete sources live beside it.

pub mod eastmoney;
pub mod json_dir;
pub mod normalize;

use anyhow::Result;
use futures_util::future::BoxFuture;

use crate::types::DailyBar;

pub use eastmoney::EastmoneyClient;
pub use json_dir::JsonDirSource;
pub use normalize::{normalize_bars, FetchSpan};

/// A provider of historical daily bars for one security at a time.
///
/// Implementations return whatever the provider has in `span`, in any order;
/// an empty vec means "nothing usable". Errors are transport or decode
/// failures. Sources never retry.
pub trait BarSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_daily<'a>(&'a self, symbol: &'a str, span: FetchSpan) -> BoxFuture<'a, Result<Vec<DailyBar>>>;
}
