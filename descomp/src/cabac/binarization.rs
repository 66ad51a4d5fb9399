use serde::{Deserialize, Serialize};

/// Upper bound on per-bin contexts within one context set. Bin positions
/// beyond this share the last context.
pub(crate) const MAX_BIN_CONTEXTS: usize = 24;

/// Binarization scheme mapping one integer symbol to a bit sequence,
/// independent of whether the bits are coded through a context model or in
/// bypass mode. Signed variants map values through the `2|v| - (v < 0)`
/// zigzag before delegating to the unsigned form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binarization {
    /// Fixed-width binary, MSB first (BI).
    Binary { bits: u8 },
    /// Truncated unary: up to `cmax` one-bits plus a terminator (TU).
    TruncatedUnary { cmax: u64 },
    /// Exponential Golomb (EG).
    ExponentialGolomb,
    /// Signed exponential Golomb (SEG).
    SignedExponentialGolomb,
    /// Truncated unary prefix with an exponential Golomb escape (TEG).
    TruncatedExponentialGolomb { cmax: u64 },
    /// Signed variant of TEG (STEG).
    SignedTruncatedExponentialGolomb { cmax: u64 },
    /// Unit-wise split of a fixed-width value, each unit truncated unary
    /// (SUTU).
    SplitUnitTruncatedUnary { split_size: u8, output_bits: u8 },
    /// Signed variant of SUTU (SSUTU).
    SignedSplitUnitTruncatedUnary { split_size: u8, output_bits: u8 },
    /// Truncated unary prefix with a SUTU escape (DTU).
    DoubleTruncatedUnary {
        cmax: u64,
        split_size: u8,
        output_bits: u8,
    },
    /// Signed variant of DTU (SDTU).
    SignedDoubleTruncatedUnary {
        cmax: u64,
        split_size: u8,
        output_bits: u8,
    },
}

impl Binarization {
    /// Returns `true` if symbols are interpreted as signed two's-complement
    /// values of the stream's word size.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Binarization::SignedExponentialGolomb
                | Binarization::SignedTruncatedExponentialGolomb { .. }
                | Binarization::SignedSplitUnitTruncatedUnary { .. }
                | Binarization::SignedDoubleTruncatedUnary { .. }
        )
    }

    /// Short scheme name as used in configurations and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Binarization::Binary { .. } => "BI",
            Binarization::TruncatedUnary { .. } => "TU",
            Binarization::ExponentialGolomb => "EG",
            Binarization::SignedExponentialGolomb => "SEG",
            Binarization::TruncatedExponentialGolomb { .. } => "TEG",
            Binarization::SignedTruncatedExponentialGolomb { .. } => "STEG",
            Binarization::SplitUnitTruncatedUnary { .. } => "SUTU",
            Binarization::SignedSplitUnitTruncatedUnary { .. } => "SSUTU",
            Binarization::DoubleTruncatedUnary { .. } => "DTU",
            Binarization::SignedDoubleTruncatedUnary { .. } => "SDTU",
        }
    }

    /// Number of distinct per-bin contexts one context set holds for this
    /// scheme. Encoder and decoder derive identical bin positions, so the
    /// clamp to [`MAX_BIN_CONTEXTS`] never desynchronizes them.
    #[must_use]
    pub(crate) fn context_set_size(&self) -> usize {
        let max_bins = match self {
            Binarization::Binary { bits } => *bits as u64,
            Binarization::TruncatedUnary { cmax } => *cmax,
            Binarization::ExponentialGolomb | Binarization::SignedExponentialGolomb => {
                MAX_BIN_CONTEXTS as u64
            }
            Binarization::TruncatedExponentialGolomb { cmax }
            | Binarization::SignedTruncatedExponentialGolomb { cmax } => {
                cmax.saturating_add(MAX_BIN_CONTEXTS as u64)
            }
            Binarization::SplitUnitTruncatedUnary { output_bits, .. }
            | Binarization::SignedSplitUnitTruncatedUnary { output_bits, .. } => {
                *output_bits as u64
            }
            Binarization::DoubleTruncatedUnary {
                cmax, output_bits, ..
            }
            | Binarization::SignedDoubleTruncatedUnary {
                cmax, output_bits, ..
            } => cmax.saturating_add(*output_bits as u64),
        };

        (max_bins.min(MAX_BIN_CONTEXTS as u64) as usize).max(1)
    }
}
