/// `AddressLayout` describes how a memory address is split into tag, set index, and block offset
/// fields for a cache with `2^set_bits` sets and `2^block_bits` byte blocks.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AddressLayout {
    pub set_bits: u32,
    pub block_bits: u32,
}

/// `DecodedAddress` holds the fields of an address that the cache actually inspects. The block
/// offset is consumed by the layout but never stored since no data movement is modeled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DecodedAddress {
    pub set_index: usize,
    pub tag: u64,
}

impl AddressLayout {
    pub fn new(set_bits: u32, block_bits: u32) -> Self {
        Self {
            set_bits,
            block_bits,
        }
    }

    /// Number of sets addressed by this layout, `2^set_bits`.
    pub fn set_count(&self) -> usize {
        1usize << self.set_bits
    }

    /// Provided a raw address, strip the block offset and split the remainder into a set index and
    /// a tag.
    ///
    /// # Arguments
    ///
    /// * `address` - unsigned integer representing the accessed memory location
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_sim::address::AddressLayout;
    /// let layout = AddressLayout::new(4, 4);
    /// let decoded = layout.decompose(0x0000_0f1f);
    /// assert_eq!(decoded.set_index, 0x1);
    /// assert_eq!(decoded.tag, 0xf);
    /// ```
    pub fn decompose(&self, address: u64) -> DecodedAddress {
        let block = shift_right(address, self.block_bits);
        let mask = (self.set_count() as u64).wrapping_sub(1);
        DecodedAddress {
            set_index: (block & mask) as usize,
            tag: shift_right(address, self.block_bits + self.set_bits),
        }
    }
}

// a shift past the address width leaves nothing behind
fn shift_right(value: u64, bits: u32) -> u64 {
    value.checked_shr(bits).unwrap_or(0)
}
