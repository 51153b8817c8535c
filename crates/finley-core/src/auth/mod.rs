//! Bearer-token acquisition for the hosted inference service.
//!
//! - `TokenExchange`: port for the identity endpoint's token-exchange call
//! - `Clock`: injectable wall clock (milliseconds since the epoch)
//! - `TokenCache`: single-flight, expiry-aware cache in front of the exchange

pub mod clock;
pub mod exchange;
pub mod token_cache;

pub use clock::{Clock, SystemClock};
pub use exchange::{TokenExchange, TokenGrant};
pub use token_cache::{CachedToken, TokenCache};
