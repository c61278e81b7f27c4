//! Builds per-block participation records from sealed headers.

use crate::{
    BlockRecord, Council, HeaderSource, RecordDiagnostics, TrackerError, VrankConfig, Window,
    WindowDiagnostics,
};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};
use vrank_protocol::{
    DecodeError, KlaytnHeader, SealRecoverer, Secp256k1Recovery, SignatureRecovery,
};

/// The interval, in blocks, between window progress logs.
const PROGRESS_INTERVAL: u64 = 100;

/// Attributes committed seals to council members, one block at a time.
#[derive(Debug, Clone)]
pub struct ParticipationTracker<R = Secp256k1Recovery> {
    config: VrankConfig,
    recoverer: SealRecoverer<R>,
}

impl ParticipationTracker<Secp256k1Recovery> {
    /// Creates a tracker backed by secp256k1 seal recovery.
    pub fn new(config: VrankConfig) -> Self {
        Self::with_recoverer(config, SealRecoverer::default())
    }
}

impl<R: SignatureRecovery> ParticipationTracker<R> {
    /// Creates a tracker backed by the given seal recoverer.
    pub const fn with_recoverer(config: VrankConfig, recoverer: SealRecoverer<R>) -> Self {
        Self { config, recoverer }
    }

    /// Returns the tracker configuration.
    pub const fn config(&self) -> &VrankConfig {
        &self.config
    }

    /// Builds the participation record of a single header.
    ///
    /// Seals that fail recovery, recover outside the council, or repeat a counted member are
    /// dropped and reported in the returned [`RecordDiagnostics`]. Only a malformed extra-data
    /// field is an error.
    pub fn build_record(
        &self,
        header: &KlaytnHeader,
        council: &Council,
    ) -> Result<(BlockRecord, RecordDiagnostics), DecodeError> {
        let block = header.number;
        let extra = header.extra()?;
        let mut voted = vec![false; council.len()];
        let mut diagnostics = RecordDiagnostics::default();

        for (seal_index, committer) in
            self.recoverer.committers(header.hash, &extra).into_iter().enumerate()
        {
            let committer = match committer {
                Ok(committer) => committer,
                Err(err) => {
                    debug!(
                        target: "tracker",
                        block,
                        seal_index,
                        %err,
                        "failed to recover committed seal"
                    );
                    diagnostics.failed_recoveries += 1;
                    continue;
                }
            };
            match council.position(&committer) {
                Some(index) if voted[index] => diagnostics.duplicates += 1,
                Some(index) => voted[index] = true,
                None => {
                    warn!(
                        target: "tracker",
                        block,
                        %committer,
                        "committed seal from outside the council"
                    );
                    diagnostics.orphans.push(committer);
                }
            }
        }

        Ok((BlockRecord::from_votes(block, council, &voted), diagnostics))
    }

    /// Fetches the council at `block` and normalizes it.
    pub async fn fetch_council<S: HeaderSource>(
        &self,
        source: &S,
        block: u64,
    ) -> Result<Council, TrackerError> {
        let members = source
            .council_at(block)
            .await
            .map_err(|err| TrackerError::Council { block, source: Box::new(err) })?;
        let council = Council::new(members);
        if council.is_empty() {
            return Err(TrackerError::EmptyCouncil(block));
        }
        info!(target: "tracker", block, members = council.len(), "fetched council");
        Ok(council)
    }

    /// Checks the window, fetches the council at `start` and builds the window.
    pub async fn download<S: HeaderSource>(
        &self,
        source: &S,
        start: u64,
        end: u64,
    ) -> Result<Window, TrackerError> {
        self.config.check_window(start, end)?;
        let council = self.fetch_council(source, start).await?;
        self.build_window(start, end, source, council).await
    }

    /// Builds one record per block in `[start, end]` against a fixed council.
    ///
    /// The window is checked before any fetch. Headers are fetched with bounded concurrency but
    /// records are built in block order. Any fetch or decode failure discards the whole window.
    pub async fn build_window<S: HeaderSource>(
        &self,
        start: u64,
        end: u64,
        source: &S,
        council: Council,
    ) -> Result<Window, TrackerError> {
        self.config.check_window(start, end)?;
        info!(
            target: "tracker",
            start,
            end,
            members = council.len(),
            "building participation window"
        );

        let mut headers = stream::iter(start..=end)
            .map(|block| async move {
                source
                    .header_by_number(block)
                    .await
                    .map(|header| (block, header))
                    .map_err(|err| TrackerError::Fetch { block, source: Box::new(err) })
            })
            .buffered(self.config.fetch_concurrency);

        let mut records = Vec::with_capacity((end - start + 1) as usize);
        let mut diagnostics = WindowDiagnostics::default();
        while let Some((block, header)) = headers.try_next().await? {
            if header.number != block {
                return Err(TrackerError::UnexpectedHeader {
                    requested: block,
                    received: header.number,
                });
            }
            let (record, record_diagnostics) = self
                .build_record(&header, &council)
                .map_err(|source| TrackerError::Decode { block, source })?;

            vrank_macros::inc!(counter, crate::Metrics::BLOCKS_PROCESSED);
            vrank_macros::add!(
                counter,
                crate::Metrics::SEALS_RECOVERED,
                record.voters.len() as u64
            );
            vrank_macros::add!(
                counter,
                crate::Metrics::SEAL_RECOVERY_FAILURES,
                record_diagnostics.failed_recoveries as u64
            );
            vrank_macros::add!(
                counter,
                crate::Metrics::ORPHAN_SEALS,
                record_diagnostics.orphans.len() as u64
            );

            diagnostics.absorb(&record, &record_diagnostics);
            records.push(record);

            if (block - start) % PROGRESS_INTERVAL == 0 {
                info!(target: "tracker", block, remaining = end - block, "building records");
            }
        }

        info!(
            target: "tracker",
            start,
            end,
            recovered = diagnostics.recovered_seals,
            failed = diagnostics.failed_recoveries,
            orphans = diagnostics.orphans,
            duplicates = diagnostics.duplicates,
            "built participation window"
        );
        Ok(Window {
            start_block: start,
            end_block: end,
            period: self.config.period,
            council,
            records,
            diagnostics,
        })
    }
}
