pub(crate) use self::{
    form::{
        FieldState,
        checkbox_field,
        form_field,
    },
    time::Timestamp,
};

mod form;
mod time;
