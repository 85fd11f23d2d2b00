//! Process resource sampling
//!
//! Takes a single point-in-time reading of this process's CPU and memory use
//! from /proc/self/stat and /proc/self/status. A sample is taken once, after
//! the workload finishes; it is not integrated or averaged over the run.
//!
//! CPU usage is the process's cumulative CPU time (user + system) divided by
//! its wall-clock age at the moment of the sample, so 150.0 means one and a
//! half cores busy on average since the process started.
//!
//! On platforms without procfs every sample is `None`.

use std::fs;

/// Point sample of process resource usage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    /// CPU utilization percentage (0.0 - 100.0 * num_cores)
    pub cpu_percent: f64,
    /// Resident Set Size (RSS) in bytes
    pub memory_rss_bytes: u64,
}

impl ResourceSample {
    /// Sample current resource usage
    ///
    /// Returns None if the proc files cannot be read or parsed.
    pub fn take() -> Option<Self> {
        let stat = fs::read_to_string("/proc/self/stat").ok()?;
        let status = fs::read_to_string("/proc/self/status").ok()?;
        let uptime = fs::read_to_string("/proc/uptime").ok()?;

        let times = parse_cpu_times(&stat)?;
        let uptime_secs = parse_uptime(&uptime)?;
        let memory_rss_bytes = parse_vm_rss(&status)?;

        Some(Self {
            cpu_percent: times.cpu_percent(clock_ticks_per_sec(), uptime_secs),
            memory_rss_bytes,
        })
    }
}

/// Number of CPU cores available to this process
pub fn available_cores() -> usize {
    num_cpus::get()
}

/// CPU accounting fields from /proc/self/stat, in clock ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CpuTimes {
    pub utime: u64,
    pub stime: u64,
    /// Process start time, in ticks since boot
    pub starttime: u64,
}

impl CpuTimes {
    fn cpu_percent(&self, ticks_per_sec: u64, uptime_secs: f64) -> f64 {
        if ticks_per_sec == 0 {
            return 0.0;
        }
        let age_secs = uptime_secs - self.starttime as f64 / ticks_per_sec as f64;
        if age_secs <= 0.0 {
            return 0.0;
        }
        let cpu_secs = (self.utime + self.stime) as f64 / ticks_per_sec as f64;
        cpu_secs / age_secs * 100.0
    }
}

fn clock_ticks_per_sec() -> u64 {
    // SAFETY: sysconf has no preconditions
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    // USER_HZ is 100 on every mainstream Linux configuration
    if ticks > 0 { ticks as u64 } else { 100 }
}

/// Parse utime, stime and starttime out of /proc/self/stat
///
/// The command name (field 2) is parenthesised and may contain spaces, so
/// fields are counted from the last ')'.
pub(crate) fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let after_comm = &stat[stat.rfind(')')? + 1..];
    // Index 0 here is field 3 (state); utime/stime/starttime are fields 14/15/22
    let fields: Vec<&str> = after_comm.split_whitespace().collect();

    Some(CpuTimes {
        utime: fields.get(11)?.parse().ok()?,
        stime: fields.get(12)?.parse().ok()?,
        starttime: fields.get(19)?.parse().ok()?,
    })
}

/// Parse VmRSS (reported in kB) out of /proc/self/status
pub(crate) fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

fn parse_uptime(uptime: &str) -> Option<f64> {
    uptime.split_whitespace().next()?.parse().ok()
}
