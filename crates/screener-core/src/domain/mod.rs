//! 스크리너 도메인 모델.

pub mod company;
pub mod indicator;
pub mod methodology;
pub mod ranking;
pub mod score;

pub use company::*;
pub use indicator::*;
pub use methodology::*;
pub use ranking::*;
pub use score::*;
