use cropcare_core::dashboard::{CropHealthView, WeatherView};

use super::Loadable;

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub weather: Loadable<WeatherView>,
    pub crop_health: Loadable<CropHealthView>,
}

impl DashboardState {
    pub fn reload(&mut self) {
        self.weather = Loadable::Loading;
        self.crop_health = Loadable::Loading;
    }
}
