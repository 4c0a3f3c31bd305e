//! In-process register bank implementing [`RegisterPort`].
//!
//! Stands in for a controller during tests and in the server's simulated
//! mode. Unwritten words read as zero. Faults can be injected for reads
//! and for writes after a number of successful ones, and every successful
//! write is journaled in order.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::address::{Device, DeviceAddress};
use crate::codec;
use crate::error::Result;
use crate::ports::{RegisterFault, RegisterPort};

/// One successful write, as seen by the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// First address written.
    pub address: DeviceAddress,
    /// Words written.
    pub words: Vec<u16>,
}

#[derive(Debug, Default)]
struct Faults {
    read: Option<String>,
    writes_before_fault: Option<usize>,
    write_message: String,
}

/// Simulated controller memory.
#[derive(Debug, Default)]
pub struct SimulatedRegisters {
    memory: Mutex<BTreeMap<(Device, u32), u16>>,
    journal: Mutex<Vec<WriteRecord>>,
    faults: Mutex<Faults>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedRegisters {
    /// Creates an all-zero bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every read and write by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores `words` at `address` without journaling.
    pub fn set_words(&self, address: DeviceAddress, words: &[u16]) {
        let mut memory = lock(&self.memory);
        for (i, word) in words.iter().enumerate() {
            memory.insert((address.device(), address.offset() + i as u32), *word);
        }
    }

    /// Stores `text` encoded over `word_count` words at `address`.
    pub fn set_text(&self, address: DeviceAddress, text: &str, word_count: usize) -> Result<()> {
        let words = codec::encode(text, word_count)?;
        self.set_words(address, &words);
        Ok(())
    }

    /// Returns `count` words starting at `address`, ignoring faults.
    pub fn words(&self, address: DeviceAddress, count: usize) -> Vec<u16> {
        let memory = lock(&self.memory);
        (0..count)
            .map(|i| {
                memory
                    .get(&(address.device(), address.offset() + i as u32))
                    .copied()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Decodes `word_count` words at `address`, ignoring faults.
    pub fn text(&self, address: DeviceAddress, word_count: usize) -> String {
        codec::decode(&self.words(address, word_count))
    }

    /// Makes every read fail with `message`; `None` clears the fault.
    pub fn fail_reads(&self, message: Option<&str>) {
        lock(&self.faults).read = message.map(str::to_string);
    }

    /// Lets `successful` more writes through, then fails every write.
    pub fn fail_writes_after(&self, successful: usize, message: &str) {
        let mut faults = lock(&self.faults);
        faults.writes_before_fault = Some(successful);
        faults.write_message = message.to_string();
    }

    /// Clears every injected fault.
    pub fn clear_faults(&self) {
        *lock(&self.faults) = Faults::default();
    }

    /// Successful writes in the order they happened.
    pub fn journal(&self) -> Vec<WriteRecord> {
        lock(&self.journal).clone()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RegisterPort for SimulatedRegisters {
    async fn read_words(
        &self,
        address: DeviceAddress,
        count: usize,
    ) -> std::result::Result<Vec<u16>, RegisterFault> {
        self.pause().await;
        if let Some(message) = lock(&self.faults).read.clone() {
            return Err(RegisterFault::new(message));
        }
        if address.checked_add(count).is_none() {
            return Err(RegisterFault::new(format!(
                "read of {count} words at {address} leaves the device"
            )));
        }
        Ok(self.words(address, count))
    }

    async fn write_words(
        &self,
        address: DeviceAddress,
        words: &[u16],
    ) -> std::result::Result<(), RegisterFault> {
        self.pause().await;
        {
            let mut faults = lock(&self.faults);
            match faults.writes_before_fault {
                Some(0) => return Err(RegisterFault::new(faults.write_message.clone())),
                Some(n) => faults.writes_before_fault = Some(n - 1),
                None => {}
            }
        }
        if address.checked_add(words.len()).is_none() {
            return Err(RegisterFault::new(format!(
                "write of {} words at {address} leaves the device",
                words.len()
            )));
        }
        self.set_words(address, words);
        lock(&self.journal).push(WriteRecord {
            address,
            words: words.to_vec(),
        });
        Ok(())
    }
}
