pub mod batch;
pub mod cache;
pub mod codec;
pub mod errors;
pub mod executor;
pub mod query;
pub mod rated;
pub mod report;
mod spans;
pub mod stakingrewards;
pub mod transport;

pub use batch::{resolve_all, BatchResults, ErrorDescriptor, ErrorKind};
pub use cache::{ResponseCache, WriteOutcome};
pub use codec::{compute_key, CacheKey};
pub use errors::{
    CacheError, ConfigError, ResolveError, ShapeError, StakescanError, TransportError,
};
pub use executor::{CachePolicy, QueryExecutor, QueryRequest};
pub use query::{ArgValue, Arguments};
pub use rated::{RatedClient, RatedClientBuilder, TotalStakeSummary};
pub use report::{build_stake_share_report, ProviderStakeRecord, StakeShareReport};
pub use stakingrewards::{
    AssetMetricsOptions, MetricsOrder, MetricsScope, OrderDirection, ProvidersQuery,
    StakeShareOptions, StakingRewardsClient, StakingRewardsClientBuilder,
};
pub use transport::{HttpTransport, Transport};
