//! GraphQL documents

pub const GET_ORDER_FOR_EDIT: &str = r#"
query getOrderForEdit($id: ID!) {
  order(id: $id) {
    id
    name
    createdAt
    customer {
      firstName
      lastName
      email
    }
    discountApplications(first: 50) {
      nodes {
        __typename
        value {
          __typename
          ... on MoneyV2 {
            amount
          }
          ... on PricingPercentageValue {
            percentage
          }
        }
        ... on ManualDiscountApplication {
          title
          description
        }
        ... on AutomaticDiscountApplication {
          title
        }
        ... on ScriptDiscountApplication {
          title
        }
        ... on DiscountCodeApplication {
          code
        }
      }
    }
    lineItems(first: 250) {
      nodes {
        id
        title
        refundableQuantity
        image {
          url
        }
        variant {
          id
          displayName
          price
          selectedOptions {
            name
            value
          }
        }
        discountedUnitPriceSet {
          presentmentMoney {
            amount
          }
        }
      }
    }
  }
}
"#;

pub const ORDER_EDIT_BEGIN: &str = r#"
mutation orderEditBegin($id: ID!) {
  orderEditBegin(id: $id) {
    calculatedOrder {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const ORDER_EDIT_ADD_CUSTOM_ITEM: &str = r#"
mutation orderEditAddCustomItem($id: ID!, $title: String!, $price: MoneyInput!, $quantity: Int!) {
  orderEditAddCustomItem(id: $id, title: $title, price: $price, quantity: $quantity) {
    calculatedLineItem {
      id
    }
    calculatedOrder {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const ORDER_EDIT_SET_QUANTITY: &str = r#"
mutation orderEditSetQuantity($id: ID!, $lineItemId: ID!, $quantity: Int!) {
  orderEditSetQuantity(id: $id, lineItemId: $lineItemId, quantity: $quantity, restock: false) {
    calculatedLineItem {
      id
    }
    calculatedOrder {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const ORDER_EDIT_ADD_LINE_ITEM_DISCOUNT: &str = r#"
mutation orderEditAddLineItemDiscount($id: ID!, $lineItemId: ID!, $discount: OrderEditAppliedDiscountInput!) {
  orderEditAddLineItemDiscount(id: $id, lineItemId: $lineItemId, discount: $discount) {
    calculatedLineItem {
      id
      calculatedDiscountAllocations {
        discountApplication {
          id
          description
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const ORDER_EDIT_UPDATE_DISCOUNT: &str = r#"
mutation orderEditUpdateDiscount($id: ID!, $discountApplicationId: ID!, $discount: OrderEditAppliedDiscountInput!) {
  orderEditUpdateDiscount(id: $id, discountApplicationId: $discountApplicationId, discount: $discount) {
    calculatedOrder {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub const ORDER_EDIT_COMMIT: &str = r#"
mutation orderEditCommit($id: ID!, $notifyCustomer: Boolean!, $staffNote: String!) {
  orderEditCommit(id: $id, notifyCustomer: $notifyCustomer, staffNote: $staffNote) {
    order {
      id
    }
    userErrors {
      field
      message
    }
  }
}
"#;
