//! 基础设施层
//!
//! 持有批次运行期间的共享资源，只对外暴露能力。
//! 目前唯一的共享资源是答案详情台账 [`DetailStore`]。

pub mod detail_store;

pub use detail_store::DetailStore;
