use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_MICROS: AtomicI64 = AtomicI64::new(0);

// 単調増加の壁時計（マイクロ秒）。同じマイクロ秒に複数回呼ばれても
// 必ず前回より大きい値を返す。
pub fn now_micros() -> i64 {
    let wall = Utc::now().timestamp_micros();
    let mut last = LAST_MICROS.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last + 1);
        match LAST_MICROS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}
