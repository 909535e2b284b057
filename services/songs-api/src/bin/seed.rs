/// Songsテーブル初期データ投入スクリプト
///
/// JSONファイルの楽曲一覧を読み込み、DynamoDBのSongsテーブルに一括書き込みする。
///
/// # ローカル実行
/// ```bash
/// export TABLE_NAME=songs
///
/// # デフォルトのseed/songs.jsonを投入
/// cargo run --bin seed
///
/// # ファイル・テーブル・リージョンを指定
/// cargo run --bin seed -- --file ./my-songs.json --table songs-dev --region eu-west-1
/// ```
use std::path::PathBuf;

use clap::Parser;
use songs_api::domain::Song;
use songs_api::infrastructure::config::REGION_VAR;
use songs_api::infrastructure::{
    DynamoSongRepository, EnvSettings, SongRepository, SongsConfig, init_logging,
};
use tracing::{error, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "JSONファイルの楽曲をSongsテーブルに投入")]
struct CliArgs {
    /// 楽曲一覧のJSONファイル
    #[arg(long, short = 'f', default_value = "seed/songs.json")]
    file: PathBuf,

    /// テーブル名（環境変数TABLE_NAMEより優先される）
    #[arg(long, short = 't')]
    table: Option<String>,

    /// リージョン（環境変数REGIONより優先される）
    #[arg(long, short = 'r')]
    region: Option<String>,
}

/// 引数と環境変数から設定値を決定
fn resolve_settings(args: &CliArgs) -> Result<EnvSettings, Box<dyn std::error::Error>> {
    let env_settings = EnvSettings::from_env();

    let table_name = match (&args.table, &env_settings) {
        (Some(table), _) => table.clone(),
        (None, Ok(settings)) => settings.table_name.clone(),
        (None, Err(e)) => return Err(Box::new(e.clone())),
    };
    let region = args
        .region
        .clone()
        .or_else(|| std::env::var(REGION_VAR).ok())
        .filter(|region| !region.trim().is_empty());

    Ok(EnvSettings { table_name, region })
}

/// JSONファイルから楽曲一覧を読み込み
fn load_songs(args: &CliArgs) -> Result<Vec<Song>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.file)?;
    let songs: Vec<Song> = serde_json::from_str(&content)?;
    Ok(songs)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 構造化ログを初期化
    init_logging();

    let args = CliArgs::parse();

    let songs = load_songs(&args).map_err(|e| {
        error!(file = %args.file.display(), error = %e, "楽曲ファイルの読み込み失敗");
        e
    })?;
    let settings = resolve_settings(&args)?;

    info!(
        file = %args.file.display(),
        table_name = %settings.table_name,
        song_count = songs.len(),
        "初期データ投入開始"
    );

    let config = SongsConfig::load(settings).await;
    let repo = DynamoSongRepository::new(config.dynamodb_client(), config.table_name());

    let written = repo.put_batch(&songs).await.map_err(|e| {
        error!(error = %e, "初期データ投入失敗");
        e
    })?;

    info!(written, "初期データ投入完了");
    Ok(())
}
