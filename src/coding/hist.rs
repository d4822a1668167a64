//! A Histogram that counts symbol frequencies, scales them and displays them.

#[derive(Clone, Debug)]
pub struct Histogram<const BINS: usize> {
    values: [u32; BINS],
}

impl<const BINS: usize> Default for Histogram<BINS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BINS: usize> Histogram<BINS> {
    pub fn new() -> Histogram<BINS> {
        Histogram { values: [0; BINS] }
    }

    pub fn from_data<Ty: Into<usize> + Copy>(values: &[Ty]) -> Histogram<BINS> {
        // Fill the histogram in four buckets to allow instruction-level
        // parallelism.
        let mut hist0 = [0; BINS];
        let mut hist1 = [0; BINS];
        let mut hist2 = [0; BINS];
        let mut hist3 = [0; BINS];

        let mut i = 0;
        while i + 3 < values.len() {
            hist0[Into::into(values[i])] += 1;
            hist1[Into::into(values[i + 1])] += 1;
            hist2[Into::into(values[i + 2])] += 1;
            hist3[Into::into(values[i + 3])] += 1;
            i += 4;
        }
        while i < values.len() {
            hist0[Into::into(values[i])] += 1;
            i += 1;
        }

        let mut hist = [0; BINS];
        for i in 0..BINS {
            hist[i] = hist0[i] + hist1[i] + hist2[i] + hist3[i];
        }

        Histogram { values: hist }
    }

    /// Count one occurrence of 'sym'.
    pub fn add(&mut self, sym: usize) {
        debug_assert!(sym < BINS, "Invalid symbol");
        self.values[sym] = self.values[sym].saturating_add(1);
    }

    pub fn get_bins(&self) -> &[u32; BINS] {
        &self.values
    }

    /// Returns the number of symbols with a non-zero count.
    pub fn used_symbols(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }

    /// Divide all of the counts by two. Non-zero values stay non-zero, so the
    /// set of used symbols does not change.
    pub fn halve(&mut self) {
        for val in self.values.iter_mut() {
            if *val != 0 {
                *val = (*val / 2).max(1);
            }
        }
    }

    pub fn dump(&self) {
        let mut first_non_zero = BINS;
        let mut last_non_zero = 0;
        let mut max = 0;

        // Find the max value and the non-zero ranges.
        for (i, val) in self.values.iter().enumerate() {
            if *val != 0 {
                first_non_zero = first_non_zero.min(i);
                last_non_zero = last_non_zero.max(i);
                max = max.max(*val);
            }
        }

        if max == 0 {
            println!("-- empty --");
            return;
        }

        fn print_bar(index: usize, value: usize, len: usize) {
            print!("{}) ", index);
            for _ in 0..len {
                print!("#");
            }
            println!(" - {}", value);
        }

        // Print the values.
        for i in first_non_zero..last_non_zero + 1 {
            let dots = 40 * self.values[i] as u64 / max as u64;
            print_bar(i, self.values[i] as usize, dots as usize);
        }
    }
}

/// Returns the number of bits needed to represent the word 'num'.
pub fn num_bits(num: u32) -> u32 {
    32 - num.leading_zeros()
}
