use env_logger::Builder;
use log::LevelFilter;

// ログ設定
pub fn init() {
    build().init();
}

// テストなど、既にロガーが設定されている可能性がある場合はこちら
pub fn try_init() -> Result<(), log::SetLoggerError> {
    build().try_init()
}

fn build() -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Debug)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true);
    builder
}
