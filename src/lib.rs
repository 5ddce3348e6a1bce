//! Vehicle Dashboard
//!
//! 車両トラッキングAPIから一覧を取得し、検索・絞り込み・ソート・選択・Excel出力を行う。

pub mod browse;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod gateway;
pub mod logging;
