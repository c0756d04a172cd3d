use super::config::{DescentConfig, ExploreConfig, FixBarriersConfig};
use super::progress::ProgressReporter;
use crate::core::energy::EnergyModel;

pub trait ProvidesDescent {
    fn descent(&self) -> &DescentConfig;
}

impl ProvidesDescent for ExploreConfig {
    fn descent(&self) -> &DescentConfig {
        &self.descent
    }
}

impl ProvidesDescent for FixBarriersConfig {
    fn descent(&self) -> &DescentConfig {
        &self.descent
    }
}

pub struct LandscapeContext<'a, M, C>
where
    M: EnergyModel + ?Sized,
    C: ProvidesDescent,
{
    pub model: &'a M,
    pub reporter: &'a ProgressReporter<'a>,
    pub config: &'a C,
}

impl<'a, M, C> LandscapeContext<'a, M, C>
where
    M: EnergyModel + ?Sized,
    C: ProvidesDescent,
{
    pub fn new(model: &'a M, reporter: &'a ProgressReporter<'a>, config: &'a C) -> Self {
        Self {
            model,
            reporter,
            config,
        }
    }

    pub fn descent(&self) -> &'a DescentConfig {
        self.config.descent()
    }
}
