//! General system configuration

use embassy_nrf::config::{Config, Debug, HfclkSource, LfclkSource};

/// Clock, regulator and debug settings applied at boot
#[derive(Clone, Copy, Debug)]
pub struct SystemConfig {
    /// Run both clocks from the external crystals
    pub external_clocks: bool,
    /// DC/DC regulator instead of the LDO
    pub dcdc: bool,
    /// Keep the debug port open for the probe
    pub debug: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            external_clocks: true,
            dcdc: true,
            debug: true,
        }
    }
}

impl SystemConfig {
    /// Build the HAL configuration
    pub fn into_embassy(self) -> Config {
        // Config is `non_exhaustive`, start from the default
        let mut config = Config::default();

        if self.external_clocks {
            config.hfclk_source = HfclkSource::ExternalXtal;
            config.lfclk_source = LfclkSource::ExternalXtal;
        }

        // DC/DC massively reduces runtime current consumption
        config.dcdc.reg1 = self.dcdc;

        config.debug = if self.debug {
            Debug::Allowed
        } else {
            Debug::Disallowed
        };

        config
    }
}
