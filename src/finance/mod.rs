//! Money coming in from students and going out to suppliers.

mod endpoints;
mod expense;
mod finances_page;
mod payment;

pub use endpoints::{
    create_expense_endpoint, create_payment_endpoint, delete_expense_endpoint,
    delete_payment_endpoint,
};
pub use expense::{
    Expense, ExpenseId, ExpenseStatus, NewExpense, create_expense, create_expense_table,
    delete_expense, get_expenses,
};
pub use finances_page::get_finances_page;
pub use payment::{
    NewPayment, Payment, PaymentId, PaymentListing, PaymentMethod, PaymentStatus, PaymentType,
    create_payment, create_payment_table, delete_payment, get_payments,
};
