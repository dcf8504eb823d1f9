//! 基础设施层

pub mod database;
pub mod logger;
pub mod memory;
