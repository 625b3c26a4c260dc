//! Element and attribute names used on the wire.

// SOAP
pub const ENVELOPE: &str = "Envelope";
pub const HEADER: &str = "Header";
pub const BODY: &str = "Body";
pub const FAULT: &str = "Fault";
pub const FAULT_CODE: &str = "faultcode";
pub const FAULT_STRING: &str = "faultstring";
pub const REQUEST_SERVER_VERSION: &str = "RequestServerVersion";
pub const TIME_ZONE_CONTEXT: &str = "TimeZoneContext";

// Response messages
pub const RESPONSE_MESSAGES: &str = "ResponseMessages";
pub const RESPONSE_CODE: &str = "ResponseCode";
pub const MESSAGE_TEXT: &str = "MessageText";

// Shapes and ids
pub const ITEM_SHAPE: &str = "ItemShape";
pub const FOLDER_SHAPE: &str = "FolderShape";
pub const BASE_SHAPE: &str = "BaseShape";
pub const BODY_TYPE: &str = "BodyType";
pub const FILTER_HTML_CONTENT: &str = "FilterHtmlContent";
pub const ADDITIONAL_PROPERTIES: &str = "AdditionalProperties";
pub const FIELD_URI: &str = "FieldURI";
pub const FOLDER_ID: &str = "FolderId";
pub const DISTINGUISHED_FOLDER_ID: &str = "DistinguishedFolderId";
pub const MAILBOX: &str = "Mailbox";
pub const EMAIL_ADDRESS: &str = "EmailAddress";
pub const ITEM_ID: &str = "ItemId";

// SyncFolderItems
pub const SYNC_FOLDER_ITEMS: &str = "SyncFolderItems";
pub const SYNC_FOLDER_ITEMS_RESPONSE: &str = "SyncFolderItemsResponse";
pub const SYNC_FOLDER_ITEMS_RESPONSE_MESSAGE: &str = "SyncFolderItemsResponseMessage";
pub const SYNC_FOLDER_ID: &str = "SyncFolderId";
pub const SYNC_STATE: &str = "SyncState";
pub const IGNORE: &str = "Ignore";
pub const MAX_CHANGES_RETURNED: &str = "MaxChangesReturned";
pub const SYNC_SCOPE: &str = "SyncScope";
pub const INCLUDES_LAST_ITEM_IN_RANGE: &str = "IncludesLastItemInRange";
pub const CHANGES: &str = "Changes";
pub const CREATE: &str = "Create";
pub const UPDATE: &str = "Update";
pub const DELETE: &str = "Delete";
pub const READ_FLAG_CHANGE: &str = "ReadFlagChange";
pub const IS_READ: &str = "IsRead";

// Time zones
pub const TIME_ZONE_DEFINITION: &str = "TimeZoneDefinition";
pub const PERIODS: &str = "Periods";
pub const PERIOD: &str = "Period";
pub const TRANSITIONS_GROUPS: &str = "TransitionsGroups";
pub const TRANSITIONS_GROUP: &str = "TransitionsGroup";
pub const TRANSITIONS: &str = "Transitions";
pub const TRANSITION: &str = "Transition";
pub const ABSOLUTE_DATE_TRANSITION: &str = "AbsoluteDateTransition";
pub const RECURRING_DAY_TRANSITION: &str = "RecurringDayTransition";
pub const RECURRING_DATE_TRANSITION: &str = "RecurringDateTransition";
pub const TO: &str = "To";
pub const DATE_TIME: &str = "DateTime";
pub const TIME_OFFSET: &str = "TimeOffset";
pub const MONTH: &str = "Month";
pub const DAY_OF_WEEK: &str = "DayOfWeek";
pub const OCCURRENCE: &str = "Occurrence";
pub const DAY: &str = "Day";

// Attributes
pub const ATTR_ID: &str = "Id";
pub const ATTR_CHANGE_KEY: &str = "ChangeKey";
pub const ATTR_NAME: &str = "Name";
pub const ATTR_BIAS: &str = "Bias";
pub const ATTR_KIND: &str = "Kind";
pub const ATTR_VERSION: &str = "Version";
pub const ATTR_FIELD_URI: &str = "FieldURI";
pub const ATTR_RESPONSE_CLASS: &str = "ResponseClass";
