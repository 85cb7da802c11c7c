//! Host capability detection.
//!
//! The dispatch table is populated from a bitset of instruction tiers, each
//! named after the microarchitecture family that introduced the feature
//! bundle. Detection runs once at init; the bitset is also part of the
//! public API so embedders can log or pin a tier.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Bitset
// ─────────────────────────────────────────────────────────────────────────────

/// A bitset of supported instruction tiers.
///
/// `SERIAL` is always set. On x86, each tier implies every lower x86 tier
/// (`ICE` ⊃ `SKYLAKE` ⊃ `HASWELL`); on ARM the vector and AES bits vary
/// independently, matching how the features ship in silicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(u32);

impl Capabilities {
    /// Portable scalar baseline; always present.
    pub const SERIAL: Capabilities = Capabilities(1 << 0);
    /// ARM NEON (128-bit Advanced SIMD).
    pub const NEON: Capabilities = Capabilities(1 << 1);
    /// ARM NEON plus the AES extension.
    pub const NEON_AES: Capabilities = Capabilities(1 << 2);
    /// ARM Scalable Vector Extension.
    pub const SVE: Capabilities = Capabilities(1 << 3);
    /// ARM SVE2.
    pub const SVE2: Capabilities = Capabilities(1 << 4);
    /// ARM SVE2 plus the AES extension.
    pub const SVE2_AES: Capabilities = Capabilities(1 << 5);
    /// x86 tier 1: AVX2 with BMI1/BMI2.
    pub const HASWELL: Capabilities = Capabilities(1 << 6);
    /// x86 tier 2: AVX-512 F/BW/VL plus VBMI2 and VPCLMULQDQ.
    pub const SKYLAKE: Capabilities = Capabilities(1 << 7);
    /// x86 tier 3: tier 2 plus VNNI, BF16, and VPOPCNTDQ.
    pub const ICE: Capabilities = Capabilities(1 << 8);

    /// The empty set. Useful as a starting point when composing a mask for
    /// [`dispatch_table_update`](crate::dispatch_table_update).
    pub const fn none() -> Self {
        Capabilities(0)
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// The raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reconstructs a bitset from raw bits, keeping only known bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Capabilities(bits & 0x1FF)
    }
}

impl core::ops::BitOr for Capabilities {
    type Output = Capabilities;
    #[inline]
    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Capabilities {
    #[inline]
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

// Fixed rendering order: baseline first, then ARM tiers, then x86 tiers.
const NAMES: &[(Capabilities, &str)] = &[
    (Capabilities::SERIAL, "serial"),
    (Capabilities::NEON, "neon"),
    (Capabilities::NEON_AES, "neon+aes"),
    (Capabilities::SVE, "sve"),
    (Capabilities::SVE2, "sve2"),
    (Capabilities::SVE2_AES, "sve2+aes"),
    (Capabilities::HASWELL, "haswell"),
    (Capabilities::SKYLAKE, "skylake"),
    (Capabilities::ICE, "ice"),
];

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for &(bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Detects the instruction tiers supported by the host CPU.
///
/// Cheap enough to call repeatedly, but the dispatch table caches the result
/// of the first call; see [`dispatch_table_init`](crate::dispatch_table_init).
pub fn capabilities() -> Capabilities {
    let mut caps = Capabilities::SERIAL;

    #[cfg(target_arch = "x86_64")]
    {
        let haswell = std::arch::is_x86_feature_detected!("avx2")
            && std::arch::is_x86_feature_detected!("bmi1")
            && std::arch::is_x86_feature_detected!("bmi2");
        let skylake = haswell
            && std::arch::is_x86_feature_detected!("avx512f")
            && std::arch::is_x86_feature_detected!("avx512bw")
            && std::arch::is_x86_feature_detected!("avx512vl")
            && std::arch::is_x86_feature_detected!("avx512vbmi2")
            && std::arch::is_x86_feature_detected!("vpclmulqdq");
        let ice = skylake
            && std::arch::is_x86_feature_detected!("avx512vnni")
            && std::arch::is_x86_feature_detected!("avx512bf16")
            && std::arch::is_x86_feature_detected!("avx512vpopcntdq");
        if haswell {
            caps |= Capabilities::HASWELL;
        }
        if skylake {
            caps |= Capabilities::SKYLAKE;
        }
        if ice {
            caps |= Capabilities::ICE;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let neon = std::arch::is_aarch64_feature_detected!("neon");
        if neon {
            caps |= Capabilities::NEON;
            if std::arch::is_aarch64_feature_detected!("aes") {
                caps |= Capabilities::NEON_AES;
            }
        }
        if std::arch::is_aarch64_feature_detected!("sve") {
            caps |= Capabilities::SVE;
        }
        if std::arch::is_aarch64_feature_detected!("sve2") {
            caps |= Capabilities::SVE2;
            if std::arch::is_aarch64_feature_detected!("sve2-aes") {
                caps |= Capabilities::SVE2_AES;
            }
        }
    }

    caps
}

/// Renders a capability bitset as a stable, comma-separated list.
///
/// The order is fixed regardless of the host, so the string is suitable for
/// logs and golden tests: `"serial,haswell,skylake"`.
pub fn capabilities_to_string(caps: Capabilities) -> String {
    caps.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_is_always_reported() {
        assert!(capabilities().contains(Capabilities::SERIAL));
    }

    #[test]
    fn x86_tiers_are_cumulative() {
        let caps = capabilities();
        if caps.contains(Capabilities::ICE) {
            assert!(caps.contains(Capabilities::SKYLAKE));
        }
        if caps.contains(Capabilities::SKYLAKE) {
            assert!(caps.contains(Capabilities::HASWELL));
        }
    }

    #[test]
    fn rendering_is_stable() {
        let caps = Capabilities::SERIAL | Capabilities::SKYLAKE | Capabilities::HASWELL;
        assert_eq!(capabilities_to_string(caps), "serial,haswell,skylake");
        assert_eq!(capabilities_to_string(Capabilities::none()), "none");
    }

    #[test]
    fn from_bits_truncate_drops_unknown_bits() {
        let caps = Capabilities::from_bits_truncate(u32::MAX);
        assert!(caps.contains(Capabilities::SERIAL));
        assert!(caps.contains(Capabilities::ICE));
        assert_eq!(caps.bits() & !0x1FF, 0);
    }
}
