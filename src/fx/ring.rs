/// Fixed-capacity sample ring addressed through a power-of-two mask
pub struct RingBuffer {
    buffer: Vec<f32>,
    mask: usize,
}

impl RingBuffer {
    /// Allocate a zeroed ring holding at least `min_capacity` samples.
    /// The capacity is rounded up to the next power of two.
    pub fn new(min_capacity: usize) -> Self {
        let capacity = min_capacity.max(2).next_power_of_two();
        Self {
            buffer: vec![0.0; capacity],
            mask: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn mask(&self) -> usize {
        self.mask
    }

    /// Zero every slot without reallocating
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    #[inline]
    pub fn read(&self, index: usize) -> f32 {
        self.buffer[index & self.mask]
    }

    #[inline]
    pub fn write(&mut self, index: usize, sample: f32) {
        self.buffer[index & self.mask] = sample;
    }

    /// Add onto the sample already stored at `index`
    #[inline]
    pub fn accumulate(&mut self, index: usize, sample: f32) {
        self.buffer[index & self.mask] += sample;
    }

    /// Linearly interpolated read `frac` of the way from slot `index` towards
    /// the slot after it. The following slot wraps past the end.
    #[inline]
    pub fn read_frac(&self, index: usize, frac: f32) -> f32 {
        let s0 = self.read(index);
        let s1 = self.read(index.wrapping_add(1));
        s0 + frac * (s1 - s0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(RingBuffer::new(1000).capacity(), 1024);
        assert_eq!(RingBuffer::new(1024).capacity(), 1024);
        assert_eq!(RingBuffer::new(0).capacity(), 2);
        assert_eq!(RingBuffer::new(0x30000).capacity(), 0x40000);
    }

    #[test]
    fn starts_zeroed() {
        let ring = RingBuffer::new(64);
        assert!((0..64).all(|i| ring.read(i) == 0.0));
    }

    #[test]
    fn masked_index_matches_modulo() {
        for shift in 1..10 {
            let n = 1usize << shift;
            let mut ring = RingBuffer::new(n);
            for writes in 0..(n * 3 + 7) {
                ring.write(writes, writes as f32);
                assert_eq!(writes & ring.mask(), writes % n);
                assert_eq!(ring.read(writes % n), writes as f32);
            }
        }
    }

    #[test]
    fn clear_zeroes_without_changing_capacity() {
        let mut ring = RingBuffer::new(16);
        for i in 0..16 {
            ring.write(i, 1.0);
        }
        ring.clear();
        assert_eq!(ring.capacity(), 16);
        assert!((0..16).all(|i| ring.read(i) == 0.0));
    }

    #[test]
    fn accumulate_adds_onto_slot() {
        let mut ring = RingBuffer::new(8);
        ring.write(3, 0.25);
        ring.accumulate(11, 0.5);
        assert_eq!(ring.read(3), 0.75);
    }

    #[test]
    fn frac_read_is_exact_at_integer_positions() {
        let mut ring = RingBuffer::new(8);
        for i in 0..8 {
            ring.write(i, (i * i) as f32 * 0.1);
        }
        for i in 0..8 {
            assert_eq!(ring.read_frac(i, 0.0), ring.read(i));
        }
    }

    #[test]
    fn frac_read_stays_between_endpoints() {
        let mut ring = RingBuffer::new(8);
        ring.write(2, -0.4);
        ring.write(3, 0.9);
        ring.write(4, 0.1);
        for step in 1..10 {
            let frac = step as f32 / 10.0;
            let up = ring.read_frac(2, frac);
            assert!(up > -0.4 && up < 0.9, "{} out of bounds", up);
            let down = ring.read_frac(3, frac);
            assert!(down > 0.1 && down < 0.9, "{} out of bounds", down);
        }
        assert!((ring.read_frac(2, 0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn frac_read_wraps_past_last_slot() {
        let mut ring = RingBuffer::new(4);
        ring.write(3, 1.0);
        ring.write(0, 3.0);
        assert!((ring.read_frac(3, 0.5) - 2.0).abs() < 1e-6);
    }
}
