mod expr;
pub use expr::{BinaryOp, Expr, ExprBinaryOp, ExprInList};

mod limit;
pub use limit::Limit;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod path;
pub use path::Path;

mod query;
pub use query::{Query, Returning};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
