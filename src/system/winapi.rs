//! Windows per-core CPU times.
//!
//! Uses `NtQuerySystemInformation(SystemProcessorPerformanceInformation)`,
//! which returns one record per logical processor in the current processor
//! group, in 100ns units. Kernel time INCLUDES idle time.

use std::mem;

use anyhow::{bail, Result};
use ntapi::ntexapi::{
    NtQuerySystemInformation, SystemProcessorPerformanceInformation,
    SYSTEM_PROCESSOR_PERFORMANCE_INFORMATION,
};

use crate::system::cpu::{CoreTicks, TickSource};

// STATUS_INFO_LENGTH_MISMATCH = 0xC0000004
const STATUS_INFO_LENGTH_MISMATCH: i32 = 0xC0000004_u32 as i32;

/// Buffer growth limit; one processor group holds at most 64 entries
const MAX_PROCESSORS: usize = 256;

pub struct NtProcessorTimes;

impl NtProcessorTimes {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NtProcessorTimes {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for NtProcessorTimes {
    fn core_ticks(&self) -> Result<Vec<CoreTicks>> {
        let entry_size = mem::size_of::<SYSTEM_PROCESSOR_PERFORMANCE_INFORMATION>();
        let mut capacity = 64usize;

        loop {
            // Safety: plain-old-data struct of integers and LARGE_INTEGER unions
            let mut buffer: Vec<SYSTEM_PROCESSOR_PERFORMANCE_INFORMATION> =
                vec![unsafe { mem::zeroed() }; capacity];
            let mut return_length: u32 = 0;

            let status = unsafe {
                NtQuerySystemInformation(
                    SystemProcessorPerformanceInformation,
                    buffer.as_mut_ptr() as *mut _,
                    (capacity * entry_size) as u32,
                    &mut return_length,
                )
            };

            if status == STATUS_INFO_LENGTH_MISMATCH {
                capacity *= 2;
                if capacity > MAX_PROCESSORS {
                    bail!("processor performance table larger than {} entries", MAX_PROCESSORS);
                }
                continue;
            }
            if status < 0 {
                bail!("NtQuerySystemInformation failed with NTSTATUS {:#010x}", status as u32);
            }

            let count = (return_length as usize / entry_size).min(capacity);
            return Ok(buffer[..count].iter().map(to_core_ticks).collect());
        }
    }
}

fn to_core_ticks(info: &SYSTEM_PROCESSOR_PERFORMANCE_INFORMATION) -> CoreTicks {
    // Safety: QuadPart is the full 64-bit view of each LARGE_INTEGER
    let (idle, kernel, user) = unsafe {
        (
            *info.IdleTime.QuadPart() as u64,
            *info.KernelTime.QuadPart() as u64,
            *info.UserTime.QuadPart() as u64,
        )
    };

    CoreTicks {
        user,
        system: kernel.saturating_sub(idle),
        idle,
        ..CoreTicks::default()
    }
}
