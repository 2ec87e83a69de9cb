use serde::{Deserialize, Serialize};

use crate::state::{Subsystem, SystemStatus};

/// Level-1 control panel toggles, one per subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActivationPanel {
    active: [bool; 5],
}

impl ActivationPanel {
    #[must_use]
    pub const fn is_active(&self, system: Subsystem) -> bool {
        self.active[system.index()]
    }

    /// Flip a toggle and return the status the panel should now display.
    pub const fn toggle(&mut self, system: Subsystem) -> SystemStatus {
        let slot = &mut self.active[system.index()];
        *slot = !*slot;
        if *slot {
            SystemStatus::Nominal
        } else {
            SystemStatus::Standby
        }
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|on| **on).count()
    }

    #[must_use]
    pub fn all_active(&self) -> bool {
        self.active.iter().all(|on| *on)
    }

    pub fn clear(&mut self) {
        self.active = [false; 5];
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, bool)> + '_ {
        Subsystem::ALL
            .into_iter()
            .map(|system| (system, self.is_active(system)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_returns_to_standby() {
        let mut panel = ActivationPanel::default();
        assert_eq!(panel.toggle(Subsystem::LifeSupport), SystemStatus::Nominal);
        assert!(panel.is_active(Subsystem::LifeSupport));
        assert_eq!(panel.active_count(), 1);
        assert_eq!(panel.toggle(Subsystem::LifeSupport), SystemStatus::Standby);
        assert_eq!(panel.active_count(), 0);
    }

    #[test]
    fn all_active_requires_every_system() {
        let mut panel = ActivationPanel::default();
        for system in Subsystem::ALL.into_iter().skip(1) {
            panel.toggle(system);
        }
        assert!(!panel.all_active());
        panel.toggle(Subsystem::LifeSupport);
        assert!(panel.all_active());
        panel.clear();
        assert_eq!(panel.iter().filter(|(_, on)| *on).count(), 0);
    }
}
