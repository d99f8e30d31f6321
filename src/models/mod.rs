//! Wire payloads of the ShopMunim backend and the client-side shapes derived
//! from them. Everything is re-exported at `crate::models`.

pub mod notification;
pub mod preferences;
pub mod profile;
pub mod shop;

pub use self::notification::*;
pub use self::preferences::*;
pub use self::profile::*;
pub use self::shop::*;
