pub const GROUNDED_TEMPLATE: &str = "Requirements: If the question is not related to the context, return 'I don't know, please contact HR for more information'.
Question: {query}
Context: {context}
Answer:";

pub const UNGROUNDED_TEMPLATE: &str = "Question: {query}
Answer:";
