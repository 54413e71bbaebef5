//! Waiting for attached volumes to appear as device nodes

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use raidformer_types::WaitPolicy;
use tracing::info;

use crate::error::{Result, SysError};

/// Time source for the device wait.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `Instant::now` and `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Block until every device exists, polling at `policy.interval`.
pub fn wait_for_devices(devices: &[String], policy: &WaitPolicy) -> Result<()> {
    wait_for_devices_with(
        devices,
        policy,
        |device| Path::new(device).exists(),
        &mut SystemClock,
    )
}

/// Poll with an injected existence check and clock.
///
/// A single deadline of `policy.timeout` covers the whole list. No sleep
/// extends past it.
pub fn wait_for_devices_with<E, C>(
    devices: &[String],
    policy: &WaitPolicy,
    mut exists: E,
    clock: &mut C,
) -> Result<()>
where
    E: FnMut(&str) -> bool,
    C: Clock + ?Sized,
{
    let deadline = clock.now() + policy.timeout;

    for device in devices {
        loop {
            info!("Waiting for {} to become available.", device);
            if exists(device) {
                info!("{} has been found.", device);
                break;
            }
            let now = clock.now();
            if now >= deadline {
                return Err(SysError::DeviceTimeout {
                    device: device.clone(),
                    waited: policy.timeout,
                });
            }
            clock.sleep(policy.interval.min(deadline - now));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Clock that only moves when slept on.
    struct ManualClock {
        now: Instant,
        slept: Vec<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Instant::now(),
                slept: Vec::new(),
            }
        }

        fn total_slept(&self) -> Duration {
            self.slept.iter().sum()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
            self.slept.push(duration);
        }
    }

    fn policy(interval: u64, timeout: u64) -> WaitPolicy {
        WaitPolicy {
            interval: Duration::from_secs(interval),
            timeout: Duration::from_secs(timeout),
        }
    }

    #[test]
    fn returns_once_every_device_appears() {
        let devices = vec!["/dev/xvdf1".to_string(), "/dev/xvdf2".to_string()];
        // Each device appears after a number of checks.
        let mut checks_until_present = HashMap::from([("/dev/xvdf1", 2), ("/dev/xvdf2", 1)]);
        let mut clock = ManualClock::new();

        wait_for_devices_with(
            &devices,
            &policy(10, 600),
            |device| {
                let remaining = checks_until_present.get_mut(device).unwrap();
                if *remaining == 0 {
                    true
                } else {
                    *remaining -= 1;
                    false
                }
            },
            &mut clock,
        )
        .unwrap();

        assert_eq!(clock.slept, vec![Duration::from_secs(10); 3]);
    }

    #[test]
    fn gives_up_at_the_deadline() {
        let devices = vec!["/dev/xvdf1".to_string()];
        let mut clock = ManualClock::new();

        let error = wait_for_devices_with(&devices, &policy(7, 30), |_| false, &mut clock)
            .unwrap_err();

        assert_eq!(
            clock.slept,
            vec![
                Duration::from_secs(7),
                Duration::from_secs(7),
                Duration::from_secs(7),
                Duration::from_secs(7),
                Duration::from_secs(2),
            ]
        );
        match error {
            SysError::DeviceTimeout { device, waited } => {
                assert_eq!(device, "/dev/xvdf1");
                assert_eq!(waited, Duration::from_secs(30));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn interval_longer_than_timeout_is_clamped() {
        let devices = vec!["/dev/xvdf1".to_string()];
        let mut clock = ManualClock::new();

        let result = wait_for_devices_with(&devices, &policy(60, 25), |_| false, &mut clock);

        assert!(matches!(result, Err(SysError::DeviceTimeout { .. })));
        assert_eq!(clock.total_slept(), Duration::from_secs(25));
    }

    #[test]
    fn timeout_is_measured_in_elapsed_time_not_polls() {
        let devices = vec!["/dev/xvdf1".to_string()];
        let mut clock = ManualClock::new();
        let mut checks = 0;

        let result = wait_for_devices_with(
            &devices,
            &policy(1, 60),
            |_| {
                checks += 1;
                false
            },
            &mut clock,
        );

        assert!(result.is_err());
        assert_eq!(clock.total_slept(), Duration::from_secs(60));
        assert_eq!(checks, 61);
    }

    #[test]
    fn existing_devices_need_no_sleep() {
        let devices = vec!["/dev/xvdf1".to_string(), "/dev/xvdf2".to_string()];
        let mut clock = ManualClock::new();
        wait_for_devices_with(&devices, &policy(10, 0), |_| true, &mut clock).unwrap();
        assert!(clock.slept.is_empty());
    }
}
