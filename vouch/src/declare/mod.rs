//! Declaration groups: one-line declarations expanded into test cases.

pub mod controller;
pub mod model;
pub mod view;

pub use controller::ControllerGroup;
pub use model::{
    ColumnOptions, ColumnsOptions, HasManyOptions, HasOneOptions, LengthRangeOptions,
    MessageOptions, MinimumLengthOptions, ModelGroup, UniqueOptions, ValueRangeOptions,
};
pub use view::ViewGroup;
