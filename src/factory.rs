use crate::bar::Bar;
use crate::config::BarSpec;
use crate::shapes::Rect;

/// Lays out bars side by side from a `BarSpec`.
#[derive(Debug, Clone)]
pub struct BarFactory {
    number: usize,
    max_fill: u32,
    spec: BarSpec,
}

impl BarFactory {
    pub fn new(number: usize, max_fill: u32, spec: BarSpec) -> Self {
        Self {
            number,
            max_fill,
            spec,
        }
    }

    pub fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    pub fn set_max_fill(&mut self, max_fill: u32) {
        self.max_fill = max_fill;
    }

    pub fn set_spec(&mut self, spec: BarSpec) {
        self.spec = spec;
    }

    pub fn spec_mut(&mut self) -> &mut BarSpec {
        &mut self.spec
    }

    pub fn make(&self) -> Vec<Bar> {
        let s = &self.spec;
        let half = s.stroke_width as i32 / 2;
        let stroke = s.stroke_width as i32;

        (0..self.number as i32)
            .map(|i| {
                let x = s.offset + (s.separation + s.width) * i;
                let outline = Rect::outline(
                    x - half,
                    s.offset - half,
                    s.width + stroke,
                    s.height + stroke,
                    s.stroke_color.clone(),
                    s.stroke_width,
                );
                let fill = Rect::filled(x, s.offset, s.width, s.height, s.empty_color.clone());
                Bar::new(
                    outline,
                    fill,
                    self.max_fill,
                    s.full_color.clone(),
                    s.wait_color.clone(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Paint;
    use crate::types::Color;

    #[test]
    fn bars_are_laid_out_left_to_right() {
        let bars = BarFactory::new(3, 200, BarSpec::default()).make();
        assert_eq!(bars.len(), 3);

        let xs: Vec<i32> = bars.iter().map(|b| b.fill_rect().x).collect();
        assert_eq!(xs, vec![10, 60, 110]);

        let first = &bars[0];
        assert_eq!(first.fill_rect().y, 10);
        assert_eq!(first.fill_rect().height, 300);
        assert_eq!(first.fill_rect().color, Color::GREY);
        assert_eq!(first.max_fill(), 200);
        assert_eq!(first.current_fill(), 0);
    }

    #[test]
    fn outline_surrounds_the_fill_by_the_stroke_width() {
        let bars = BarFactory::new(2, 200, BarSpec::default()).make();
        let outline = bars[1].outline();

        assert_eq!((outline.x, outline.y), (59, 9));
        assert_eq!((outline.width, outline.height), (22, 302));
        assert_eq!(outline.paint, Paint::Outline { thickness: 2 });
        assert_eq!(outline.color, Color::BLACK);
    }

    #[test]
    fn set_max_fill_changes_capacity_not_count() {
        let mut factory = BarFactory::new(4, 200, BarSpec::default());
        factory.set_max_fill(50);
        let bars = factory.make();

        assert_eq!(bars.len(), 4);
        assert!(bars.iter().all(|b| b.max_fill() == 50));
    }

    #[test]
    fn spec_edits_apply_to_the_next_batch() {
        let mut factory = BarFactory::new(1, 10, BarSpec::default());
        factory.spec_mut().width = 8;
        factory.set_number(2);
        let bars = factory.make();

        assert_eq!(bars[1].fill_rect().x, 10 + 38);
        assert_eq!(bars[1].fill_rect().width, 8);
    }
}
