//! Operation Catalogue
//!
//! The fixed set of payment-provider operations an agent may be offered.
//! Every operation is a variant of [`Operation`]; its name, permission
//! category, action and argument schema are resolved by exhaustive `match`,
//! so adding a variant without describing it fails to compile.

use serde::Serialize;

use crate::configuration::Configuration;
use crate::schema::{ArgumentSchema, FieldSchema, FieldType};

/// Permission category an operation belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Customers,
    Products,
    Prices,
    PaymentLinks,
    Invoices,
    InvoiceItems,
    Balance,
    Refunds,
    PaymentIntents,
    BillingSessions,
    MeterEvents,
}

impl Category {
    pub const ALL: [Self; 11] = [
        Self::Customers,
        Self::Products,
        Self::Prices,
        Self::PaymentLinks,
        Self::Invoices,
        Self::InvoiceItems,
        Self::Balance,
        Self::Refunds,
        Self::PaymentIntents,
        Self::BillingSessions,
        Self::MeterEvents,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Products => "products",
            Self::Prices => "prices",
            Self::PaymentLinks => "payment_links",
            Self::Invoices => "invoices",
            Self::InvoiceItems => "invoice_items",
            Self::Balance => "balance",
            Self::Refunds => "refunds",
            Self::PaymentIntents => "payment_intents",
            Self::BillingSessions => "billing_sessions",
            Self::MeterEvents => "meter_events",
        }
    }

    /// Parse a configuration key. Accepts snake_case and camelCase spellings;
    /// unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "customers" => Some(Self::Customers),
            "products" => Some(Self::Products),
            "prices" => Some(Self::Prices),
            "payment_links" | "paymentLinks" => Some(Self::PaymentLinks),
            "invoices" => Some(Self::Invoices),
            "invoice_items" | "invoiceItems" => Some(Self::InvoiceItems),
            "balance" => Some(Self::Balance),
            "refunds" => Some(Self::Refunds),
            "payment_intents" | "paymentIntents" => Some(Self::PaymentIntents),
            "billing_sessions" | "billingSessions" | "billing_portal_sessions" => {
                Some(Self::BillingSessions)
            }
            "meter_events" | "meterEvents" => Some(Self::MeterEvents),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of access an operation needs within its category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    List,
    Update,
    Retrieve,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Update => "update",
            Self::Retrieve => "retrieve",
        }
    }

    /// Parse a configuration key into the actions it grants.
    ///
    /// `read` is the legacy spelling for both `list` and `retrieve`.
    pub fn from_key(key: &str) -> &'static [Self] {
        match key {
            "create" => &[Self::Create],
            "list" => &[Self::List],
            "update" => &[Self::Update],
            "retrieve" => &[Self::Retrieve],
            "read" => &[Self::List, Self::Retrieve],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every operation the toolkit knows how to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateCustomer,
    ListCustomers,
    CreateProduct,
    ListProducts,
    CreatePrice,
    ListPrices,
    CreatePaymentLink,
    ListInvoices,
    CreateInvoice,
    CreateInvoiceItem,
    FinalizeInvoice,
    RetrieveBalance,
    CreateRefund,
    ListPaymentIntents,
    CreateBillingPortalSession,
    CreateMeterEvent,
}

const LIMIT_DESCRIPTION: &str =
    "A limit on the number of objects to be returned. Limit can range between 1 and 100, and the default is 10.";

impl Operation {
    pub const ALL: [Self; 16] = [
        Self::CreateCustomer,
        Self::ListCustomers,
        Self::CreateProduct,
        Self::ListProducts,
        Self::CreatePrice,
        Self::ListPrices,
        Self::CreatePaymentLink,
        Self::ListInvoices,
        Self::CreateInvoice,
        Self::CreateInvoiceItem,
        Self::FinalizeInvoice,
        Self::RetrieveBalance,
        Self::CreateRefund,
        Self::ListPaymentIntents,
        Self::CreateBillingPortalSession,
        Self::CreateMeterEvent,
    ];

    /// Unique identifier used by frameworks and the dispatcher
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateCustomer => "create_customer",
            Self::ListCustomers => "list_customers",
            Self::CreateProduct => "create_product",
            Self::ListProducts => "list_products",
            Self::CreatePrice => "create_price",
            Self::ListPrices => "list_prices",
            Self::CreatePaymentLink => "create_payment_link",
            Self::ListInvoices => "list_invoices",
            Self::CreateInvoice => "create_invoice",
            Self::CreateInvoiceItem => "create_invoice_item",
            Self::FinalizeInvoice => "finalize_invoice",
            Self::RetrieveBalance => "retrieve_balance",
            Self::CreateRefund => "create_refund",
            Self::ListPaymentIntents => "list_payment_intents",
            Self::CreateBillingPortalSession => "create_billing_portal_session",
            Self::CreateMeterEvent => "create_meter_event",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::CreateCustomer => "Create Customer",
            Self::ListCustomers => "List Customers",
            Self::CreateProduct => "Create Product",
            Self::ListProducts => "List Products",
            Self::CreatePrice => "Create Price",
            Self::ListPrices => "List Prices",
            Self::CreatePaymentLink => "Create Payment Link",
            Self::ListInvoices => "List Invoices",
            Self::CreateInvoice => "Create Invoice",
            Self::CreateInvoiceItem => "Create Invoice Item",
            Self::FinalizeInvoice => "Finalize Invoice",
            Self::RetrieveBalance => "Retrieve Balance",
            Self::CreateRefund => "Create Refund",
            Self::ListPaymentIntents => "List Payment Intents",
            Self::CreateBillingPortalSession => "Create Billing Portal Session",
            Self::CreateMeterEvent => "Create Meter Event",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::CreateCustomer | Self::ListCustomers => Category::Customers,
            Self::CreateProduct | Self::ListProducts => Category::Products,
            Self::CreatePrice | Self::ListPrices => Category::Prices,
            Self::CreatePaymentLink => Category::PaymentLinks,
            Self::ListInvoices | Self::CreateInvoice | Self::FinalizeInvoice => Category::Invoices,
            Self::CreateInvoiceItem => Category::InvoiceItems,
            Self::RetrieveBalance => Category::Balance,
            Self::CreateRefund => Category::Refunds,
            Self::ListPaymentIntents => Category::PaymentIntents,
            Self::CreateBillingPortalSession => Category::BillingSessions,
            Self::CreateMeterEvent => Category::MeterEvents,
        }
    }

    pub const fn action(self) -> Action {
        match self {
            Self::ListCustomers
            | Self::ListProducts
            | Self::ListPrices
            | Self::ListInvoices
            | Self::ListPaymentIntents => Action::List,
            Self::FinalizeInvoice => Action::Update,
            Self::RetrieveBalance => Action::Retrieve,
            Self::CreateCustomer
            | Self::CreateProduct
            | Self::CreatePrice
            | Self::CreatePaymentLink
            | Self::CreateInvoice
            | Self::CreateInvoiceItem
            | Self::CreateRefund
            | Self::CreateBillingPortalSession
            | Self::CreateMeterEvent => Action::Create,
        }
    }

    /// Description shown to the LLM
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateCustomer => "This tool will create a customer in Stripe.\n\nIt takes two arguments:\n- name (str): The name of the customer.\n- email (str, optional): The email of the customer.",
            Self::ListCustomers => "This tool will fetch a list of Customers from Stripe.\n\nIt takes two optional arguments:\n- limit (int, optional): The number of customers to return.\n- email (str, optional): A case-sensitive filter on the customer's email.",
            Self::CreateProduct => "This tool will create a product in Stripe.\n\nIt takes two arguments:\n- name (str): The name of the product.\n- description (str, optional): The description of the product.",
            Self::ListProducts => "This tool will fetch a list of Products from Stripe.\n\nIt takes one optional argument:\n- limit (int, optional): The number of products to return.",
            Self::CreatePrice => "This tool will create a price in Stripe. If a product has not already been specified, a product should be created first.\n\nIt takes three arguments:\n- product (str): The ID of the product to create the price for.\n- unit_amount (int): The unit amount of the price in cents.\n- currency (str): The currency of the price.",
            Self::ListPrices => "This tool will fetch a list of Prices from Stripe.\n\nIt takes two arguments:\n- product (str, optional): The ID of the product to list prices for.\n- limit (int, optional): The number of prices to return.",
            Self::CreatePaymentLink => "This tool will create a payment link in Stripe.\n\nIt takes three arguments:\n- price (str): The ID of the price to create the payment link for.\n- quantity (int): The quantity of the product to include in the payment link.\n- redirect_url (str, optional): The URL the customer will be redirected to after the purchase is complete.",
            Self::ListInvoices => "This tool will list invoices in Stripe.\n\nIt takes two arguments:\n- customer (str, optional): The ID of the customer to list the invoices for.\n- limit (int, optional): The number of invoices to return.",
            Self::CreateInvoice => "This tool will create an invoice in Stripe.\n\nIt takes two arguments:\n- customer (str): The ID of the customer to create the invoice for.\n- days_until_due (int, optional): The number of days until the invoice is due.",
            Self::CreateInvoiceItem => "This tool will create an invoice item in Stripe.\n\nIt takes three arguments:\n- customer (str): The ID of the customer to create the invoice item for.\n- price (str): The ID of the price for the item.\n- invoice (str): The ID of the invoice to create the item for.",
            Self::FinalizeInvoice => "This tool will finalize an invoice in Stripe.\n\nIt takes one argument:\n- invoice (str): The ID of the invoice to finalize.",
            Self::RetrieveBalance => "This tool will retrieve the balance from Stripe. It takes no input.",
            Self::CreateRefund => "This tool will refund a payment intent in Stripe.\n\nIt takes two arguments:\n- payment_intent (str): The ID of the payment intent to refund.\n- amount (int, optional): The amount to refund in cents.",
            Self::ListPaymentIntents => "This tool will list payment intents in Stripe.\n\nIt takes two arguments:\n- customer (str, optional): The ID of the customer to list payment intents for.\n- limit (int, optional): The number of payment intents to return.",
            Self::CreateBillingPortalSession => "This tool will create a billing portal session.\n\nIt takes two arguments:\n- customer (str): The ID of the customer to create the session for.\n- return_url (str, optional): The default URL to return to afterwards.",
            Self::CreateMeterEvent => "This tool will record a usage event against a billing meter in Stripe.\n\nIt takes three arguments:\n- event_name (str): The name of the meter event.\n- customer (str): The ID of the customer the usage belongs to.\n- value (str, optional): The usage value to record.",
        }
    }

    pub fn schema(self) -> ArgumentSchema {
        use FieldType::{Integer, String};

        let limit = || FieldSchema::optional("limit", Integer, LIMIT_DESCRIPTION).range(1, 100);

        let fields = match self {
            Self::CreateCustomer => vec![
                FieldSchema::required("name", String, "The name of the customer."),
                FieldSchema::optional("email", String, "The email of the customer."),
            ],
            Self::ListCustomers => vec![
                limit(),
                FieldSchema::optional(
                    "email",
                    String,
                    "A case-sensitive filter on the list based on the customer's email field.",
                ),
            ],
            Self::CreateProduct => vec![
                FieldSchema::required("name", String, "The name of the product."),
                FieldSchema::optional("description", String, "The description of the product."),
            ],
            Self::ListProducts => vec![limit()],
            Self::CreatePrice => vec![
                FieldSchema::required("product", String, "The ID of the product to create the price for."),
                FieldSchema::required("unit_amount", Integer, "The unit amount of the price in cents.")
                    .range(0, i64::MAX),
                FieldSchema::required("currency", String, "The currency of the price."),
            ],
            Self::ListPrices => vec![
                FieldSchema::optional("product", String, "The ID of the product to list prices for."),
                limit(),
            ],
            Self::CreatePaymentLink => vec![
                FieldSchema::required("price", String, "The ID of the price to create the payment link for."),
                FieldSchema::required("quantity", Integer, "The quantity of the product to include.")
                    .range(1, i64::MAX),
                FieldSchema::optional(
                    "redirect_url",
                    String,
                    "The URL the customer will be redirected to after the purchase is complete.",
                ),
            ],
            Self::ListInvoices => vec![
                FieldSchema::optional("customer", String, "The ID of the customer to list invoices for."),
                limit(),
            ],
            Self::CreateInvoice => vec![
                FieldSchema::required("customer", String, "The ID of the customer to create the invoice for."),
                FieldSchema::optional("days_until_due", Integer, "The number of days until the invoice is due.")
                    .range(0, i64::MAX),
            ],
            Self::CreateInvoiceItem => vec![
                FieldSchema::required("customer", String, "The ID of the customer to create the invoice item for."),
                FieldSchema::required("price", String, "The ID of the price for the item."),
                FieldSchema::required("invoice", String, "The ID of the invoice to create the item for."),
            ],
            Self::FinalizeInvoice => vec![FieldSchema::required(
                "invoice",
                String,
                "The ID of the invoice to finalize.",
            )],
            Self::RetrieveBalance => Vec::new(),
            Self::CreateRefund => vec![
                FieldSchema::required("payment_intent", String, "The ID of the PaymentIntent to refund."),
                FieldSchema::optional("amount", Integer, "The amount to refund in cents.").range(1, i64::MAX),
            ],
            Self::ListPaymentIntents => vec![
                FieldSchema::optional("customer", String, "The ID of the customer to list payment intents for."),
                limit(),
            ],
            Self::CreateBillingPortalSession => vec![
                FieldSchema::required(
                    "customer",
                    String,
                    "The ID of the customer to create the billing portal session for.",
                ),
                FieldSchema::optional("return_url", String, "The default URL to return to afterwards."),
            ],
            Self::CreateMeterEvent => vec![
                FieldSchema::required("event_name", String, "The name of the meter event."),
                FieldSchema::required("customer", String, "The ID of the customer the usage belongs to."),
                FieldSchema::optional("value", String, "The usage value to record."),
            ],
        };

        ArgumentSchema::closed(fields)
    }

    pub fn descriptor(self) -> OperationDescriptor {
        OperationDescriptor {
            operation: self,
            name: self.name(),
            title: self.title(),
            description: self.description(),
            category: self.category(),
            action: self.action(),
            schema: self.schema(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable description of one catalogue entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    #[serde(skip)]
    pub operation: Operation,

    /// Unique identifier
    pub name: &'static str,

    /// Display title
    pub title: &'static str,

    /// Description shown to the LLM
    pub description: &'static str,

    /// Permission category
    pub category: Category,

    /// Permission action
    pub action: Action,

    /// Argument schema
    pub schema: ArgumentSchema,
}

/// Ordered list of operation descriptors
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<OperationDescriptor>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalogue {
    /// The full catalogue of every known operation
    pub fn standard() -> Self {
        Self::from_descriptors(Operation::ALL.into_iter().map(Operation::descriptor).collect())
    }

    pub const fn from_descriptors(entries: Vec<OperationDescriptor>) -> Self {
        Self { entries }
    }

    /// Entries allowed by `configuration`, in catalogue order
    pub fn filter(&self, configuration: &Configuration) -> Self {
        crate::configuration::filter(self, configuration)
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|d| d.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a OperationDescriptor;
    type IntoIter = std::slice::Iter<'a, OperationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
