//! Worker id selection.
//!
//! A generator only needs a worker id in `[0, MAX_WORKER_ID]`. Where that
//! number comes from is pluggable through [`WorkerIdProvider`]: a fixed value
//! for explicit deployments and tests, or [`HardwareWorkerId`], which derives
//! one from the host's network interfaces.

use crate::MAX_WORKER_ID;

/// Supplies the worker id a generator is constructed with.
///
/// Implementations should return a value in `[0, MAX_WORKER_ID]`; anything
/// larger is rejected by the generator with
/// [`crate::Error::InvalidWorkerId`].
///
/// Any `Fn() -> u32` is a provider:
///
/// ```
/// use snowgen::WorkerIdProvider;
///
/// let from_env = || 12_u32;
/// assert_eq!(from_env.worker_id(), 12);
/// ```
pub trait WorkerIdProvider {
    fn worker_id(&self) -> u32;
}

impl<F> WorkerIdProvider for F
where
    F: Fn() -> u32,
{
    fn worker_id(&self) -> u32 {
        self()
    }
}

/// Always hands out the wrapped worker id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedWorkerId(pub u32);

impl WorkerIdProvider for FixedWorkerId {
    fn worker_id(&self) -> u32 {
        self.0
    }
}

/// Derives a worker id from the host's network hardware addresses.
///
/// Every non-zero MAC address is fed through CRC-32 (IEEE) and the checksum is
/// reduced modulo [`MAX_WORKER_ID`]. Hosts with stable NICs therefore get the
/// same worker id across restarts. If no hardware address can be read (no
/// interfaces, unsupported platform, or `getifaddrs` failing) a random id in
/// range is used instead.
///
/// Two hosts can still hash to the same id. Deployments that need a hard
/// guarantee should assign ids explicitly with [`FixedWorkerId`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HardwareWorkerId;

impl HardwareWorkerId {
    /// Lists the hardware addresses of all interfaces, skipping the all-zero
    /// address loopback devices report.
    #[cfg(target_os = "linux")]
    pub fn hardware_addrs() -> Vec<[u8; 6]> {
        let addrs = match nix::ifaddrs::getifaddrs() {
            Ok(addrs) => addrs,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_e, "failed to list network interfaces");
                return Vec::new();
            }
        };

        addrs
            .filter_map(|ifaddr| {
                ifaddr
                    .address
                    .as_ref()
                    .and_then(|addr| addr.as_link_addr())
                    .and_then(|link| link.addr())
            })
            .filter(|mac| mac.iter().any(|&b| b != 0))
            .collect()
    }

    #[cfg(not(target_os = "linux"))]
    pub fn hardware_addrs() -> Vec<[u8; 6]> {
        Vec::new()
    }
}

impl WorkerIdProvider for HardwareWorkerId {
    fn worker_id(&self) -> u32 {
        let addrs = Self::hardware_addrs();
        match worker_id_from_hardware_addrs(&addrs) {
            Some(id) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(worker_id = id, interfaces = addrs.len(), "derived worker id from hardware addresses");
                id
            }
            None => {
                let id = random_worker_id();
                #[cfg(feature = "tracing")]
                tracing::debug!(worker_id = id, "no hardware addresses found, using random worker id");
                id
            }
        }
    }
}

/// Hashes `addrs` in order into a worker id, or `None` if `addrs` is empty.
///
/// ```
/// use snowgen::{MAX_WORKER_ID, worker_id_from_hardware_addrs};
///
/// let id = worker_id_from_hardware_addrs(&[[0x02_u8, 0x42, 0xac, 0x11, 0x00, 0x02]]).unwrap();
/// assert!(id <= MAX_WORKER_ID);
/// assert_eq!(worker_id_from_hardware_addrs::<[u8; 6]>(&[]), None);
/// ```
pub fn worker_id_from_hardware_addrs<A>(addrs: &[A]) -> Option<u32>
where
    A: AsRef<[u8]>,
{
    if addrs.is_empty() {
        return None;
    }

    let mut hasher = crc32fast::Hasher::new();
    for addr in addrs {
        hasher.update(addr.as_ref());
    }
    Some(hasher.finalize() % MAX_WORKER_ID)
}

/// A uniformly random worker id in `[0, MAX_WORKER_ID]`.
pub fn random_worker_id() -> u32 {
    rand::random_range(0..=MAX_WORKER_ID)
}

/// The worker id [`HardwareWorkerId`] would hand out on this host.
pub fn default_worker_id() -> u32 {
    HardwareWorkerId.worker_id()
}
