//! Payment channel contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the two
//! contract flavors:
//!
//! - `Unidirectional` - native-asset channels; deposits ride the
//!   transaction's value field
//! - `TokenUnidirectional` - ERC20-backed channels; value moves via an
//!   approve + transferFrom step and the amount is a call argument
//!
//! The `ERC20` interface is included for the token flavor's approve step.

use alloy::sol;

sol! {
    /// Unidirectional payment channel contract (native asset)
    #[sol(rpc)]
    contract Unidirectional {
        /// Open a channel funded with the transaction's value
        function open(bytes32 channelId, address receiver, uint32 settlingPeriod) external payable;

        /// Add funds to an open channel (sender only)
        function deposit(bytes32 channelId) external payable;

        /// Begin the settling countdown (sender only)
        function startSettling(bytes32 channelId) external;

        /// Release remaining funds to the sender after the settling period
        function settle(bytes32 channelId) external;

        /// Pay `payment` to the receiver against a sender-signed claim,
        /// remainder to the sender; removes the channel
        function claim(bytes32 channelId, uint256 payment, bytes signature) external;

        /// Raw channel storage for a given id (zero sender = absent)
        function channels(bytes32 channelId) external view returns (
            address sender,
            address receiver,
            uint256 value,
            uint32 settlingPeriod,
            uint256 settlingUntil
        );

        /// Contract-defined digest that a claim signature must cover
        function paymentDigest(bytes32 channelId, uint256 payment) external view returns (bytes32 digest);

        /// Whether `signature` authorizes paying `payment` to `origin`
        function canClaim(bytes32 channelId, uint256 payment, address origin, bytes signature) external view returns (bool ok);

        event DidOpen(bytes32 indexed channelId, address indexed sender, address indexed receiver, uint256 value);
        event DidDeposit(bytes32 indexed channelId, uint256 deposit);
        event DidClaim(bytes32 indexed channelId);
        event DidStartSettling(bytes32 indexed channelId);
        event DidSettle(bytes32 indexed channelId);
    }

    /// Unidirectional payment channel contract (ERC20-backed)
    #[sol(rpc)]
    contract TokenUnidirectional {
        /// Open a channel funded with `value` of `tokenContract`
        /// (requires a prior approve for at least `value`)
        function open(bytes32 channelId, address receiver, uint32 settlingPeriod, address tokenContract, uint256 value) external;

        /// Add `value` tokens to an open channel (sender only)
        function deposit(bytes32 channelId, uint256 value) external;

        /// Begin the settling countdown (sender only)
        function startSettling(bytes32 channelId) external;

        /// Release remaining tokens to the sender after the settling period
        function settle(bytes32 channelId) external;

        /// Pay `payment` to the receiver against a sender-signed claim,
        /// remainder to the sender; removes the channel
        function claim(bytes32 channelId, uint256 payment, bytes signature) external;

        /// Raw channel storage for a given id (zero sender = absent)
        function channels(bytes32 channelId) external view returns (
            address sender,
            address receiver,
            uint256 value,
            uint32 settlingPeriod,
            uint256 settlingUntil,
            address tokenContract
        );

        /// Contract-defined digest that a claim signature must cover
        function paymentDigest(bytes32 channelId, uint256 payment, address tokenContract) external view returns (bytes32 digest);

        /// Whether `signature` authorizes paying `payment` to `origin`
        function canClaim(bytes32 channelId, uint256 payment, address origin, bytes signature) external view returns (bool ok);

        event DidOpen(bytes32 indexed channelId, address indexed sender, address indexed receiver, uint256 value, address tokenContract);
        event DidDeposit(bytes32 indexed channelId, uint256 deposit);
        event DidClaim(bytes32 indexed channelId);
        event DidStartSettling(bytes32 indexed channelId);
        event DidSettle(bytes32 indexed channelId);
    }

    /// Standard ERC20 interface (approve step for token channels)
    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);

        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
