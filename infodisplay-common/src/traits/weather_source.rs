use crate::types::{ExcludeSet, FetchError, Location, WeatherSnapshot};

/// 远程天气数据源，每次调用执行一次完整请求
pub trait RemoteWeatherSource {
    fn fetch(
        &mut self,
        location: Location,
        exclude: ExcludeSet,
    ) -> Result<WeatherSnapshot, FetchError>;
}

impl<T: RemoteWeatherSource + ?Sized> RemoteWeatherSource for Box<T> {
    fn fetch(
        &mut self,
        location: Location,
        exclude: ExcludeSet,
    ) -> Result<WeatherSnapshot, FetchError> {
        (**self).fetch(location, exclude)
    }
}
