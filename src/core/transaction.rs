use serde::{Deserialize, Serialize};

/// A value transfer waiting in the pending pool or sealed inside a block.
///
/// Fields are deliberately unchecked: any sender/recipient string and any
/// amount (zero and negative included) is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: i64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: i64) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> i64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let tx = Transaction::new("alice", "bob", 10);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["sender"], "alice");
        assert_eq!(json["recipient"], "bob");
        assert_eq!(json["amount"], 10);
    }

    #[test]
    fn test_negative_and_zero_amounts_are_kept() {
        assert_eq!(Transaction::new("a", "b", 0).get_amount(), 0);
        assert_eq!(Transaction::new("a", "b", -7).get_amount(), -7);
    }
}
