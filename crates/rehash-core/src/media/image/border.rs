/// a pixel position on the raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoordinate {
    pub x: u32,
    pub y: u32,
}

impl PixelCoordinate {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The border pixels of a `width` x `height` raster, each exactly once.
///
/// Order: the top row left to right, the bottom row left to right, then the
/// left and right columns top to bottom without the corners. A raster that is
/// one pixel high has no separate bottom row, one that is one pixel wide has
/// no separate right column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderPixels {
    width: u32,
    height: u32,
}

impl BorderPixels {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn rows(&self) -> u64 {
        u64::from(self.height.min(2))
    }

    fn columns(&self) -> u64 {
        u64::from(self.width.min(2))
    }

    fn inner_height(&self) -> u64 {
        u64::from(self.height.saturating_sub(2))
    }

    pub fn len(&self) -> u64 {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        self.rows() * u64::from(self.width) + self.columns() * self.inner_height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// the `index`-th border pixel in the order described on the type
    pub fn get(&self, index: u64) -> Option<PixelCoordinate> {
        if index >= self.len() {
            return None;
        }

        let w = u64::from(self.width);
        let horizontal = self.rows() * w;
        let coordinate = if index < horizontal {
            let y = if index < w { 0 } else { self.height - 1 };
            PixelCoordinate::new((index % w) as u32, y)
        } else {
            let i = index - horizontal;
            let inner = self.inner_height();
            let x = if i < inner { 0 } else { self.width - 1 };
            PixelCoordinate::new(x, (i % inner) as u32 + 1)
        };

        Some(coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = PixelCoordinate> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_on_border(c: PixelCoordinate, w: u32, h: u32) -> bool {
        c.x == 0 || c.y == 0 || c.x == w - 1 || c.y == h - 1
    }

    #[test]
    fn should_count_396_border_pixels_on_100x100() {
        assert_eq!(BorderPixels::new(100, 100).len(), 396);
    }

    #[test]
    fn should_enumerate_every_border_pixel_exactly_once() {
        for (w, h) in [(1, 1), (1, 5), (5, 1), (2, 2), (2, 7), (7, 3), (10, 10), (31, 17)] {
            let border = BorderPixels::new(w, h);
            let all: Vec<_> = border.iter().collect();
            let unique: HashSet<_> = all.iter().copied().collect();

            assert_eq!(all.len() as u64, border.len(), "{w}x{h}");
            assert_eq!(unique.len(), all.len(), "{w}x{h} has duplicates");
            assert!(all.iter().all(|c| is_on_border(*c, w, h)), "{w}x{h}");

            let expected = (0..w)
                .flat_map(|x| (0..h).map(move |y| PixelCoordinate::new(x, y)))
                .filter(|c| is_on_border(*c, w, h))
                .count();
            assert_eq!(unique.len(), expected, "{w}x{h}");
        }
    }

    #[test]
    fn should_have_no_border_without_pixels() {
        assert!(BorderPixels::new(0, 10).is_empty());
        assert!(BorderPixels::new(10, 0).is_empty());
        assert_eq!(BorderPixels::new(0, 0).get(0), None);
    }

    #[test]
    fn should_follow_the_documented_order() {
        let border = BorderPixels::new(3, 3);
        let order: Vec<_> = border.iter().map(|c| (c.x, c.y)).collect();

        assert_eq!(
            order,
            vec![(0, 0), (1, 0), (2, 0), (0, 2), (1, 2), (2, 2), (0, 1), (2, 1)]
        );
        assert_eq!(border.get(8), None);
    }
}
