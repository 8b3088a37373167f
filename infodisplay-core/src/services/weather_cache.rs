use infodisplay_common::*;
use jiff::Timestamp;

/// 新鲜度检查的结果
#[derive(Debug)]
pub struct Refresh<'a> {
    /// 最近一次成功获取的数据，获取失败时仍为旧数据
    pub snapshot: Option<&'a WeatherSnapshot>,
    /// 本次调用是否替换了快照
    pub refreshed: bool,
}

/// 单个屏幕持有的天气缓存
///
/// 只在显示需要时检查新鲜度，快照超过 [`STALE_AFTER_SECS`] 秒才重新获取。
/// 获取失败只记录日志，旧快照保持不变，下次检查时重试。
pub struct WeatherCache<W: RemoteWeatherSource> {
    source: W,
    location: Location,
    exclude: ExcludeSet,
    last: Option<WeatherSnapshot>,
    last_fetch_attempt: Option<Timestamp>,
}

impl<W: RemoteWeatherSource> WeatherCache<W> {
    pub fn new(source: W, location: Location, exclude: ExcludeSet) -> Self {
        Self {
            source,
            location,
            exclude,
            last: None,
            last_fetch_attempt: None,
        }
    }

    pub fn last_fetch_attempt(&self) -> Option<Timestamp> {
        self.last_fetch_attempt
    }

    pub fn needs_refresh(&self, now: Timestamp) -> bool {
        match &self.last {
            Some(snapshot) => snapshot.is_stale(now),
            None => true,
        }
    }

    pub fn refresh_if_stale(&mut self, now: Timestamp) -> Refresh<'_> {
        let refreshed = if self.needs_refresh(now) {
            self.fetch(now)
        } else {
            false
        };

        Refresh {
            snapshot: self.last.as_ref(),
            refreshed,
        }
    }

    fn fetch(&mut self, now: Timestamp) -> bool {
        self.last_fetch_attempt = Some(now);

        match self.source.fetch(self.location, self.exclude) {
            Ok(snapshot) => {
                info!(
                    "Weather refreshed, observed at {}",
                    snapshot.observed_at
                );
                self.last = Some(snapshot);
                true
            }
            Err(e) => {
                warn!("Weather fetch failed, keeping previous data: {}", e);
                false
            }
        }
    }
}
