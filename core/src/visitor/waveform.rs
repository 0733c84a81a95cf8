//! file: core/src/visitor/waveform.rs
//! description: traversal over `Waveform` trees.
//!
//! `WaveformVisitor::visit` dispatches on the variant through
//! `walk_waveform`. Composite variants recurse into their children by
//! default and leaves do nothing, so an analysis only overrides the
//! variants it cares about.

use crate::ir::waveform::{
    Add, Aligned, Append, Constant, Linear, Negative, OpaqueFn, Poly, Record, Sample, Scale,
    Slice, Smooth, Waveform,
};

pub trait WaveformVisitor {
    type Error;

    fn visit(&mut self, waveform: &Waveform) -> Result<(), Self::Error> {
        walk_waveform(self, waveform)
    }

    fn visit_constant(&mut self, _waveform: &Constant) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_linear(&mut self, _waveform: &Linear) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_poly(&mut self, _waveform: &Poly) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_opaque_fn(&mut self, _waveform: &OpaqueFn) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_append(&mut self, waveform: &Append) -> Result<(), Self::Error> {
        for part in &waveform.waveforms {
            self.visit(part)?;
        }
        Ok(())
    }

    fn visit_add(&mut self, waveform: &Add) -> Result<(), Self::Error> {
        self.visit(&waveform.left)?;
        self.visit(&waveform.right)
    }

    fn visit_aligned(&mut self, waveform: &Aligned) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_negative(&mut self, waveform: &Negative) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_record(&mut self, waveform: &Record) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_sample(&mut self, waveform: &Sample) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_scale(&mut self, waveform: &Scale) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_slice(&mut self, waveform: &Slice) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }

    fn visit_smooth(&mut self, waveform: &Smooth) -> Result<(), Self::Error> {
        self.visit(&waveform.waveform)
    }
}

pub fn walk_waveform<V: WaveformVisitor + ?Sized>(
    visitor: &mut V,
    waveform: &Waveform,
) -> Result<(), V::Error> {
    match waveform {
        Waveform::Constant(w) => visitor.visit_constant(w),
        Waveform::Linear(w) => visitor.visit_linear(w),
        Waveform::Poly(w) => visitor.visit_poly(w),
        Waveform::OpaqueFn(w) => visitor.visit_opaque_fn(w),
        Waveform::Append(w) => visitor.visit_append(w),
        Waveform::Add(w) => visitor.visit_add(w),
        Waveform::Aligned(w) => visitor.visit_aligned(w),
        Waveform::Negative(w) => visitor.visit_negative(w),
        Waveform::Record(w) => visitor.visit_record(w),
        Waveform::Sample(w) => visitor.visit_sample(w),
        Waveform::Scale(w) => visitor.visit_scale(w),
        Waveform::Slice(w) => visitor.visit_slice(w),
        Waveform::Smooth(w) => visitor.visit_smooth(w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct LeafCounter {
        leaves: usize,
        nodes: usize,
    }

    impl WaveformVisitor for LeafCounter {
        type Error = Infallible;

        fn visit(&mut self, waveform: &Waveform) -> Result<(), Infallible> {
            self.nodes += 1;
            walk_waveform(self, waveform)
        }

        fn visit_constant(&mut self, _: &Constant) -> Result<(), Infallible> {
            self.leaves += 1;
            Ok(())
        }

        fn visit_linear(&mut self, _: &Linear) -> Result<(), Infallible> {
            self.leaves += 1;
            Ok(())
        }
    }

    #[test]
    fn default_methods_reach_every_leaf() {
        let wf = Waveform::constant(1, 2)
            .append(Waveform::linear(0, 1, 2))
            .add(Waveform::constant(3, 4).scale(2).negative())
            .slice(None, None)
            .record("r");

        let mut counter = LeafCounter::default();
        counter.visit(&wf).unwrap();
        assert_eq!(counter.leaves, 3);
        // record, slice, add, append(2 leaves), negative, scale, constant
        assert_eq!(counter.nodes, 9);
    }
}
