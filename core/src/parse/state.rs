use crate::builder::{Builder, BuilderStream};
use crate::ir::params::{ParamMap, Parameters};
use crate::ir::pulse::FieldName;
use crate::ir::register::Register;
use crate::ir::sequence::{Coupling, Sequence};

/// Working state of one parse. Built fresh for every top-level call.
#[derive(Debug)]
pub(crate) struct ParseState {
    pub stream: BuilderStream,
    /// Sticky selectors: drives without their own coupling/field reuse these.
    pub coupling: Option<Coupling>,
    pub field: Option<FieldName>,
    pub sequence: Sequence,
    pub register: Option<Register>,
    pub static_params: ParamMap,
    pub batch_params: Vec<ParamMap>,
    pub order: Vec<String>,
}

impl ParseState {
    pub fn new(builder: &Builder) -> Self {
        let defaults = Parameters::default();
        ParseState {
            stream: BuilderStream::create(builder),
            coupling: None,
            field: None,
            sequence: Sequence::new(),
            register: None,
            static_params: defaults.static_params,
            batch_params: defaults.batch_params,
            order: defaults.args_list,
        }
    }

    pub fn params(&self) -> Parameters {
        Parameters {
            static_params: self.static_params.clone(),
            batch_params: self.batch_params.clone(),
            args_list: self.order.clone(),
        }
    }
}
