use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vehicle_dashboard_common::{FilterDimension, Query, SortDirection, SortState, VehicleField};

use crate::error::{DashboardError, Result};

#[derive(Parser)]
#[command(name = "vehicle-dashboard")]
#[command(about = "車両トラッキング一覧・検索・Excel出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 車両一覧を表示
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// 表ではなくJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 車両一覧をExcelに出力
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// 出力する行番号（0始まり、カンマ区切り）。省略時は表示中の全件
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<usize>>,

        /// 出力先ディレクトリ/ファイル
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// 対話的に検索・絞り込み・選択・出力
    Browse {
        /// 初期プラットフォーム（省略時は設定値）
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// プラットフォーム一覧を表示
    Platforms,

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 取得スコープと検索条件
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// プラットフォーム（all または識別子）。省略時は設定値
    #[arg(short, long)]
    pub platform: Option<String>,

    /// 検索語（全フィールド対象、大文字小文字無視）
    #[arg(short, long)]
    pub search: Option<String>,

    /// 状態で絞り込み
    #[arg(long)]
    pub status: Option<String>,

    /// プロジェクトで絞り込み
    #[arg(long)]
    pub project: Option<String>,

    /// 会社で絞り込み
    #[arg(long)]
    pub company: Option<String>,

    /// 車両種別で絞り込み
    #[arg(long)]
    pub vehicle_type: Option<String>,

    /// ソート列（例: vehicle-no, status, imei）
    #[arg(long)]
    pub sort: Option<VehicleField>,

    /// 降順でソート
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl QueryArgs {
    /// 引数から検索条件を組み立てる
    pub fn to_query(&self) -> Query {
        let mut query = Query {
            search: self.search.clone().unwrap_or_default(),
            ..Default::default()
        };

        let filters = [
            (FilterDimension::Status, &self.status),
            (FilterDimension::Project, &self.project),
            (FilterDimension::Company, &self.company),
            (FilterDimension::VehicleType, &self.vehicle_type),
        ];
        for (dimension, value) in filters {
            query.filters.set(dimension, value.clone());
        }

        query.sort = self.sort.map(|field| SortState {
            field,
            direction: if self.desc { SortDirection::Descending } else { SortDirection::Ascending },
        });
        query
    }
}

/// 行番号の指定を検証する
///
/// # Arguments
/// * `positions` - 指定された行番号
/// * `view_len` - 表示中の件数
pub fn validate_positions(positions: &[usize], view_len: usize) -> Result<()> {
    let out_of_range: Vec<String> = positions
        .iter()
        .filter(|&&p| p >= view_len)
        .map(|p| p.to_string())
        .collect();

    if out_of_range.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::InvalidSelection(format!(
            "{}（表示中 {} 件）",
            out_of_range.join(", "),
            view_len
        )))
    }
}
