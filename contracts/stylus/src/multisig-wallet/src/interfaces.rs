//! Solidity ABI surface shared with the outside world: the token collaborator and the audit log.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// The subset of ERC-20 the wallet talks to (and may be asked to forward calls to).
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool success);
        function transferFrom(address from, address to, uint256 amount) external returns (bool success);
        function approve(address spender, uint256 amount) external returns (bool success);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
    }

    event Submission(uint256 indexed transactionId, address indexed submitter);
    event Confirmation(uint256 indexed transactionId, address indexed confirmer);
    event Execution(uint256 indexed transactionId, address indexed executor);
    event ExecutionFailure(uint256 indexed transactionId);
    event Withdrawal(address indexed sender, uint256 amount);
    event TokenAdded(address indexed tokenAddress, address indexed masterKey);
    event Deposit(address indexed sender, uint256 value);
}
