//! Folder and item identifiers.

use std::fmt;

use roxmltree::Node;

use crate::error::EwsResult;
use crate::validation::validate_capability;
use crate::version::{Capability, ExchangeVersion};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

/// Well-known folders addressable without knowing their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownFolderName {
    Calendar,
    Contacts,
    DeletedItems,
    Drafts,
    Inbox,
    Journal,
    Notes,
    Outbox,
    SentItems,
    Tasks,
    MsgFolderRoot,
    PublicFoldersRoot,
    Root,
    JunkEmail,
    SearchFolders,
    VoiceMail,
    RecoverableItemsRoot,
    RecoverableItemsDeletions,
    RecoverableItemsVersions,
    RecoverableItemsPurges,
    ArchiveRoot,
    ArchiveMsgFolderRoot,
    ArchiveDeletedItems,
    ArchiveRecoverableItemsRoot,
    SyncIssues,
    Conflicts,
    LocalFailures,
    ServerFailures,
    RecipientCache,
    QuickContacts,
    ConversationHistory,
    ToDoSearch,
}

impl WellKnownFolderName {
    /// Value of `DistinguishedFolderId/@Id`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WellKnownFolderName::Calendar => "calendar",
            WellKnownFolderName::Contacts => "contacts",
            WellKnownFolderName::DeletedItems => "deleteditems",
            WellKnownFolderName::Drafts => "drafts",
            WellKnownFolderName::Inbox => "inbox",
            WellKnownFolderName::Journal => "journal",
            WellKnownFolderName::Notes => "notes",
            WellKnownFolderName::Outbox => "outbox",
            WellKnownFolderName::SentItems => "sentitems",
            WellKnownFolderName::Tasks => "tasks",
            WellKnownFolderName::MsgFolderRoot => "msgfolderroot",
            WellKnownFolderName::PublicFoldersRoot => "publicfoldersroot",
            WellKnownFolderName::Root => "root",
            WellKnownFolderName::JunkEmail => "junkemail",
            WellKnownFolderName::SearchFolders => "searchfolders",
            WellKnownFolderName::VoiceMail => "voicemail",
            WellKnownFolderName::RecoverableItemsRoot => "recoverableitemsroot",
            WellKnownFolderName::RecoverableItemsDeletions => "recoverableitemsdeletions",
            WellKnownFolderName::RecoverableItemsVersions => "recoverableitemsversions",
            WellKnownFolderName::RecoverableItemsPurges => "recoverableitemspurges",
            WellKnownFolderName::ArchiveRoot => "archiveroot",
            WellKnownFolderName::ArchiveMsgFolderRoot => "archivemsgfolderroot",
            WellKnownFolderName::ArchiveDeletedItems => "archivedeleteditems",
            WellKnownFolderName::ArchiveRecoverableItemsRoot => "archiverecoverableitemsroot",
            WellKnownFolderName::SyncIssues => "syncissues",
            WellKnownFolderName::Conflicts => "conflicts",
            WellKnownFolderName::LocalFailures => "localfailures",
            WellKnownFolderName::ServerFailures => "serverfailures",
            WellKnownFolderName::RecipientCache => "recipientcache",
            WellKnownFolderName::QuickContacts => "quickcontacts",
            WellKnownFolderName::ConversationHistory => "conversationhistory",
            WellKnownFolderName::ToDoSearch => "todosearch",
        }
    }

    /// The capability gating this folder, if it is newer than Exchange 2007 SP1.
    pub fn capability(&self) -> Option<Capability> {
        use WellKnownFolderName::*;
        match self {
            RecoverableItemsRoot
            | RecoverableItemsDeletions
            | RecoverableItemsVersions
            | RecoverableItemsPurges
            | ArchiveRoot
            | ArchiveMsgFolderRoot
            | ArchiveDeletedItems
            | ArchiveRecoverableItemsRoot => Some(Capability::ArchiveFolders),
            SyncIssues | Conflicts | LocalFailures | ServerFailures | RecipientCache
            | QuickContacts | ConversationHistory | ToDoSearch => {
                Some(Capability::Exchange2013Folders)
            }
            _ => None,
        }
    }
}

impl fmt::Display for WellKnownFolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a folder, either by server id or by well-known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderId {
    Id {
        id: String,
        change_key: Option<String>,
    },
    Distinguished {
        name: WellKnownFolderName,
        /// Mailbox owning the folder; the caller's own mailbox when unset.
        mailbox: Option<String>,
    },
}

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        FolderId::Id {
            id: id.into(),
            change_key: None,
        }
    }

    pub fn well_known(name: WellKnownFolderName) -> Self {
        FolderId::Distinguished { name, mailbox: None }
    }

    /// Checks that the folder can be addressed at the negotiated version.
    pub fn validate(&self, version: ExchangeVersion) -> EwsResult<()> {
        match self {
            FolderId::Distinguished { name, .. } => match name.capability() {
                Some(capability) => validate_capability(name.as_str(), capability, version),
                None => Ok(()),
            },
            FolderId::Id { .. } => Ok(()),
        }
    }

    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        match self {
            FolderId::Id { id, change_key } => {
                let mut attributes = vec![(names::ATTR_ID, id.as_str())];
                if let Some(change_key) = change_key {
                    attributes.push((names::ATTR_CHANGE_KEY, change_key.as_str()));
                }
                writer.write_empty_element(XmlNamespace::Types, names::FOLDER_ID, &attributes)
            }
            FolderId::Distinguished { name, mailbox: None } => writer.write_empty_element(
                XmlNamespace::Types,
                names::DISTINGUISHED_FOLDER_ID,
                &[(names::ATTR_ID, name.as_str())],
            ),
            FolderId::Distinguished {
                name,
                mailbox: Some(address),
            } => {
                writer.write_start_element_with_attributes(
                    XmlNamespace::Types,
                    names::DISTINGUISHED_FOLDER_ID,
                    &[(names::ATTR_ID, name.as_str())],
                )?;
                writer.write_start_element(XmlNamespace::Types, names::MAILBOX)?;
                writer.write_element_value(XmlNamespace::Types, names::EMAIL_ADDRESS, address)?;
                writer.write_end_element()?;
                writer.write_end_element()
            }
        }
    }
}

/// Server id of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub id: String,
    pub change_key: Option<String>,
}

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId {
            id: id.into(),
            change_key: None,
        }
    }

    pub fn with_change_key(id: impl Into<String>, change_key: impl Into<String>) -> Self {
        ItemId {
            id: id.into(),
            change_key: Some(change_key.into()),
        }
    }

    pub fn read_from_xml(node: Node<'_, '_>) -> EwsResult<Self> {
        Ok(ItemId {
            id: xml::required_attribute(node, names::ATTR_ID)?.to_string(),
            change_key: node.attribute(names::ATTR_CHANGE_KEY).map(str::to_string),
        })
    }

    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        let mut attributes = vec![(names::ATTR_ID, self.id.as_str())];
        if let Some(change_key) = &self.change_key {
            attributes.push((names::ATTR_CHANGE_KEY, change_key.as_str()));
        }
        writer.write_empty_element(XmlNamespace::Types, names::ITEM_ID, &attributes)
    }
}

/// Item ids written as a wrapped list; nothing is written when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIdList(Vec<ItemId>);

impl ItemIdList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ItemId) {
        self.0.push(id);
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.0.extend(ids);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.0.iter()
    }

    pub fn write_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        ns: XmlNamespace,
        local_name: &str,
    ) -> EwsResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        writer.write_start_element(ns, local_name)?;
        for id in &self.0 {
            id.write_to_xml(writer)?;
        }
        writer.write_end_element()
    }
}
